//! Domain types for communities, events, and tickets.
//!
//! Every status and role enum has a canonical lowercase string used on the
//! wire and in storage (`as_str`), and parses back from it (`FromStr`).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use uuid::Uuid;

macro_rules! id_type {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub struct $name(pub Uuid);

        impl $name {
            /// Create a new random ID.
            #[must_use]
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            /// Wrap an existing UUID.
            #[must_use]
            pub const fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            /// Get the inner UUID.
            #[must_use]
            pub const fn as_uuid(&self) -> &Uuid {
                &self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl FromStr for $name {
            type Err = uuid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Uuid::parse_str(s).map(Self)
            }
        }
    };
}

id_type!(
    /// Unique identifier for a user.
    UserId
);
id_type!(
    /// Unique identifier for a community.
    CommunityId
);
id_type!(
    /// Unique identifier for an event.
    EventId
);
id_type!(
    /// Unique identifier for a ticket template.
    TicketTemplateId
);
id_type!(
    /// Unique identifier for a ticket issued to a user.
    UserTicketId
);

/// A string did not name a variant of a domain enum.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("invalid {kind}: {value:?}")]
pub struct ParseEnumError {
    /// Name of the enum being parsed.
    pub kind: &'static str,
    /// The rejected input.
    pub value: String,
}

macro_rules! string_enum {
    (
        $(#[$meta:meta])*
        $name:ident as $kind:literal {
            $($(#[$vmeta:meta])* $variant:ident => $text:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(rename_all = "lowercase")]
        pub enum $name {
            $($(#[$vmeta])* $variant),+
        }

        impl $name {
            /// Every variant, in declaration order.
            pub const ALL: &'static [Self] = &[$(Self::$variant),+];

            /// Canonical lowercase representation.
            #[must_use]
            pub const fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $text),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = ParseEnumError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($text => Ok(Self::$variant),)+
                    _ => Err(ParseEnumError { kind: $kind, value: s.to_string() }),
                }
            }
        }
    };
}

string_enum!(
    /// Lifecycle status of a community.
    CommunityStatus as "community status" {
        /// Community is live.
        Active => "active",
        /// Community is archived or not yet published.
        Inactive => "inactive",
    }
);

string_enum!(
    /// Lifecycle status of an event.
    EventStatus as "event status" {
        /// Event is live.
        Active => "active",
        /// Event is archived or not yet published.
        Inactive => "inactive",
    }
);

string_enum!(
    /// Who can discover an event.
    EventVisibility as "event visibility" {
        /// Listed for everyone.
        Public => "public",
        /// Visible to members only.
        Private => "private",
        /// Reachable by link, not listed.
        Unlisted => "unlisted",
    }
);

string_enum!(
    /// Role of a user inside a community.
    CommunityRole as "community role" {
        /// Regular member.
        Member => "member",
        /// Community administrator.
        Admin => "admin",
        /// Volunteer staff (door, check-in).
        Volunteer => "volunteer",
        /// External collaborator.
        Collaborator => "collaborator",
    }
);

string_enum!(
    /// Role of a user on a single event.
    EventRole as "event role" {
        /// Regular attendee.
        Member => "member",
        /// Event administrator.
        Admin => "admin",
        /// Event collaborator (speakers, partners, crew).
        Collaborator => "collaborator",
    }
);

string_enum!(
    /// Lifecycle status of a user ticket.
    TicketStatus as "ticket status" {
        /// Ticket is valid for entrance.
        Active => "active",
        /// Ticket was issued but is not valid yet.
        Inactive => "inactive",
        /// Ticket was cancelled.
        Cancelled => "cancelled",
    }
);

string_enum!(
    /// Whether a ticket has been used at the door.
    RedemptionStatus as "redemption status" {
        /// Not used yet.
        Pending => "pending",
        /// Used. Terminal.
        Redeemed => "redeemed",
    }
);

string_enum!(
    /// Approval state for tickets that require organizer review.
    ApprovalStatus as "approval status" {
        /// Waiting for review.
        Pending => "pending",
        /// Approved by an organizer.
        Approved => "approved",
        /// Rejected by an organizer.
        Rejected => "rejected",
    }
);

string_enum!(
    /// Payment state of a ticket.
    PaymentStatus as "payment status" {
        /// Not paid (or free).
        Unpaid => "unpaid",
        /// Paid.
        Paid => "paid",
    }
);

impl CommunityRole {
    /// Admins and volunteers staff the events of their community.
    #[must_use]
    pub const fn is_staff(&self) -> bool {
        matches!(self, Self::Admin | Self::Volunteer)
    }
}

/// A platform user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// User ID.
    pub id: UserId,
    /// Unique handle.
    pub username: String,
    /// Global administrator flag.
    pub is_super_admin: bool,
}

impl User {
    /// Create a regular (non super-admin) user.
    #[must_use]
    pub fn new(username: impl Into<String>) -> Self {
        Self {
            id: UserId::new(),
            username: username.into(),
            is_super_admin: false,
        }
    }

    /// Create a global super-admin.
    #[must_use]
    pub fn super_admin(username: impl Into<String>) -> Self {
        Self {
            is_super_admin: true,
            ..Self::new(username)
        }
    }
}

/// A community that organizes events.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Community {
    /// Community ID.
    pub id: CommunityId,
    /// Display name.
    pub name: String,
    /// Lifecycle status.
    pub status: CommunityStatus,
}

impl Community {
    /// Create an active community.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: CommunityId::new(),
            name: name.into(),
            status: CommunityStatus::Active,
        }
    }
}

/// An event, owned by zero or more communities.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    /// Event ID.
    pub id: EventId,
    /// Display name.
    pub name: String,
    /// Lifecycle status.
    pub status: EventStatus,
    /// Discoverability.
    pub visibility: EventVisibility,
}

impl Event {
    /// Create an active public event.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: EventId::new(),
            name: name.into(),
            status: EventStatus::Active,
            visibility: EventVisibility::Public,
        }
    }
}

/// Purchasable or allocatable ticket definition for one event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TicketTemplate {
    /// Template ID.
    pub id: TicketTemplateId,
    /// Event this template admits to.
    pub event_id: EventId,
    /// Display name ("General admission", "Speaker", ...).
    pub name: String,
}

impl TicketTemplate {
    /// Create a template for an event.
    #[must_use]
    pub fn new(event_id: EventId, name: impl Into<String>) -> Self {
        Self {
            id: TicketTemplateId::new(),
            event_id,
            name: name.into(),
        }
    }
}

/// A ticket issued to a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserTicket {
    /// Ticket ID.
    pub id: UserTicketId,
    /// Ticket holder.
    pub user_id: UserId,
    /// Template the ticket was issued from.
    pub ticket_template_id: TicketTemplateId,
    /// Lifecycle status.
    pub status: TicketStatus,
    /// Door usage.
    pub redemption_status: RedemptionStatus,
    /// Organizer approval.
    pub approval_status: ApprovalStatus,
    /// Payment.
    pub payment_status: PaymentStatus,
    /// Issue time.
    pub created_at: DateTime<Utc>,
    /// Last modification time.
    pub updated_at: DateTime<Utc>,
}

impl UserTicket {
    /// Issue a fresh ticket: inactive, pending redemption, pending approval, unpaid.
    #[must_use]
    pub fn issue(user_id: UserId, ticket_template_id: TicketTemplateId, now: DateTime<Utc>) -> Self {
        Self {
            id: UserTicketId::new(),
            user_id,
            ticket_template_id,
            status: TicketStatus::Inactive,
            redemption_status: RedemptionStatus::Pending,
            approval_status: ApprovalStatus::Pending,
            payment_status: PaymentStatus::Unpaid,
            created_at: now,
            updated_at: now,
        }
    }

    /// Return the ticket with a different lifecycle status.
    #[must_use]
    pub const fn with_status(mut self, status: TicketStatus) -> Self {
        self.status = status;
        self
    }

    /// Return the ticket with a different redemption status.
    #[must_use]
    pub const fn with_redemption_status(mut self, redemption_status: RedemptionStatus) -> Self {
        self.redemption_status = redemption_status;
        self
    }

    /// `true` if the ticket is active and not yet used.
    #[must_use]
    pub fn is_redeemable(&self) -> bool {
        self.status == TicketStatus::Active && self.redemption_status == RedemptionStatus::Pending
    }
}
