//! External collaborators: document rendering and mail delivery

pub mod document;
pub mod mailer;

pub use document::{DocumentGenerator, IndentLetter, IndentLetterWriter, LetterItem};
pub use mailer::{HttpMailer, MailAttachment, Mailer, OutgoingMail};
