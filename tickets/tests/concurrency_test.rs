//! Concurrent redemption of the same ticket.
//!
//! Every request runs on its own store; the ticket repository's
//! compare-and-set is the only thing serializing them.

#![cfg(feature = "test-utils")]
#![allow(clippy::unwrap_used, clippy::expect_used)]

use community_testing::helpers::init_test_tracing;
use community_tickets::mocks::Fixture;
use community_tickets::providers::TicketRepository;
use community_tickets::{
    CommunityRole, EventRole, RedemptionError, RedemptionStatus, TicketRedemptionService,
};
use futures::future::join_all;

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_redemptions_yield_exactly_one_success() {
    init_test_tracing();
    let fixture = Fixture::new();
    let (owner, ticket) = fixture.actor_and_active_ticket();
    fixture.add_event_role(owner.id, EventRole::Admin);

    // Several door volunteers scan the same ticket at once
    let volunteers: Vec<_> = (0..8)
        .map(|_| {
            let (volunteer, _) = fixture.actor_and_active_ticket();
            fixture.add_community_role(volunteer.id, CommunityRole::Volunteer);
            volunteer
        })
        .collect();

    let service = TicketRedemptionService::new(fixture.environment());

    let attempts = volunteers.iter().map(|volunteer| {
        let service = service.clone();
        let actor_id = volunteer.id;
        let ticket_id = ticket.id;
        tokio::spawn(async move { service.redeem_user_ticket(ticket_id, actor_id).await })
    });

    let results: Vec<_> = join_all(attempts)
        .await
        .into_iter()
        .map(|joined| joined.expect("redemption task panicked"))
        .collect();

    let successes = results.iter().filter(|r| r.is_ok()).count();
    assert_eq!(successes, 1, "exactly one redemption should win: {results:?}");

    for result in results.iter().filter(|r| r.is_err()) {
        assert_eq!(result, &Err(RedemptionError::AlreadyRedeemed));
    }

    let stored = fixture.tickets.get_user_ticket(ticket.id).await.unwrap();
    assert_eq!(stored.redemption_status, RedemptionStatus::Redeemed);
}

#[tokio::test]
async fn concurrent_redemptions_of_different_tickets_all_succeed() {
    init_test_tracing();
    let fixture = Fixture::new();
    let (admin, _) = fixture.actor_and_active_ticket();
    fixture.add_event_role(admin.id, EventRole::Admin);

    let tickets: Vec<_> = (0..5).map(|_| fixture.actor_and_active_ticket().1).collect();
    let service = TicketRedemptionService::new(fixture.environment());

    let results = join_all(
        tickets
            .iter()
            .map(|ticket| service.redeem_user_ticket(ticket.id, admin.id)),
    )
    .await;

    assert!(results.iter().all(Result::is_ok), "{results:?}");
}
