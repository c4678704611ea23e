//! Contact form domain
//!
//! Validates a submission, composes the outbound message and relays it
//! through a transactional mail service.

mod message;
mod relay;
mod submission;

pub use message::{compose, MailMessage};
pub use relay::{HttpMailRelay, MailRelay, RelayError};
pub use submission::{category_label, ContactForm, ContactSubmission, ValidationError};
