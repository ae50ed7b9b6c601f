//! Seeded in-memory world for redemption tests.
//!
//! A [`Fixture`] starts with one active community that owns one active
//! event, and one ticket template for that event. Tests add users, roles,
//! and tickets on top.
//!
//! Seeding helpers panic on a poisoned lock, which only happens after a
//! panicking test thread.

#![allow(clippy::expect_used)]

use super::{
    MockEnvironment, MockEventRepository, MockMembershipRepository, MockTicketRepository,
    MockUserRepository,
};
use crate::types::{
    Community, CommunityRole, Event, EventRole, TicketStatus, TicketTemplate, User, UserId,
    UserTicket,
};
use chrono::Utc;

const POISONED: &str = "mock repository lock poisoned";

/// Seeded mock repositories.
#[derive(Debug, Clone)]
pub struct Fixture {
    /// Users.
    pub users: MockUserRepository,
    /// Memberships.
    pub memberships: MockMembershipRepository,
    /// Event ownership.
    pub events: MockEventRepository,
    /// Tickets and templates.
    pub tickets: MockTicketRepository,
    /// Community owning [`Fixture::event`].
    pub community: Community,
    /// Event the template admits to.
    pub event: Event,
    /// Template every fixture ticket is issued from.
    pub template: TicketTemplate,
}

impl Fixture {
    /// Seed a community, an event it owns, and a template for the event.
    ///
    /// # Panics
    ///
    /// Panics if a mock lock is poisoned.
    #[must_use]
    pub fn new() -> Self {
        let community = Community::new("Rust Santiago");
        let event = Event::new("Rust Santiago Meetup");
        let template = TicketTemplate::new(event.id, "General admission");

        let events = MockEventRepository::new();
        events.link_community(event.id, community.id).expect(POISONED);

        let tickets = MockTicketRepository::new();
        tickets.insert_template(template.clone()).expect(POISONED);

        Self {
            users: MockUserRepository::new(),
            memberships: MockMembershipRepository::new(),
            events,
            tickets,
            community,
            event,
            template,
        }
    }

    /// Redemption environment over these repositories, with the system clock.
    #[must_use]
    pub fn environment(&self) -> MockEnvironment {
        MockEnvironment::new(
            self.users.clone(),
            self.memberships.clone(),
            self.events.clone(),
            self.tickets.clone(),
        )
    }

    /// Store a user.
    ///
    /// # Panics
    ///
    /// Panics if a mock lock is poisoned.
    pub fn add_user(&self, user: User) -> User {
        self.users.insert(user.clone()).expect(POISONED);
        user
    }

    /// Give `user_id` a role in the fixture community.
    ///
    /// # Panics
    ///
    /// Panics if a mock lock is poisoned.
    pub fn add_community_role(&self, user_id: UserId, role: CommunityRole) {
        self.memberships
            .set_community_role(user_id, self.community.id, role)
            .expect(POISONED);
    }

    /// Give `user_id` a role on the fixture event.
    ///
    /// # Panics
    ///
    /// Panics if a mock lock is poisoned.
    pub fn add_event_role(&self, user_id: UserId, role: EventRole) {
        self.memberships
            .set_event_role(user_id, self.event.id, role)
            .expect(POISONED);
    }

    /// Add a second community that also owns the fixture event.
    ///
    /// # Panics
    ///
    /// Panics if a mock lock is poisoned.
    pub fn add_owning_community(&self, name: &str) -> Community {
        let community = Community::new(name);
        self.events
            .link_community(self.event.id, community.id)
            .expect(POISONED);
        community
    }

    /// Issue a ticket from the fixture template to `user_id`.
    ///
    /// # Panics
    ///
    /// Panics if a mock lock is poisoned.
    pub fn issue_ticket(&self, user_id: UserId, status: TicketStatus) -> UserTicket {
        let ticket = UserTicket::issue(user_id, self.template.id, Utc::now()).with_status(status);
        self.tickets.insert_ticket(ticket.clone()).expect(POISONED);
        ticket
    }

    /// A fresh regular user holding a ticket with `status`.
    ///
    /// # Panics
    ///
    /// Panics if a mock lock is poisoned.
    pub fn actor_and_ticket(&self, status: TicketStatus) -> (User, UserTicket) {
        let user = self.add_user(User::new(format!("user-{}", UserId::new())));
        let ticket = self.issue_ticket(user.id, status);
        (user, ticket)
    }

    /// A fresh regular user holding an active ticket.
    ///
    /// # Panics
    ///
    /// Panics if a mock lock is poisoned.
    pub fn actor_and_active_ticket(&self) -> (User, UserTicket) {
        self.actor_and_ticket(TicketStatus::Active)
    }
}

impl Default for Fixture {
    fn default() -> Self {
        Self::new()
    }
}
