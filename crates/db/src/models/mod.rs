pub mod category;
pub mod certificate;
pub mod lookup;
pub mod notification_template;
pub mod user;
