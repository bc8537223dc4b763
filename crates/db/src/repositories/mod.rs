pub mod category_repo;
pub mod certificate_repo;
pub mod lookup_repo;
pub mod notification_template_repo;
pub mod user_repo;

pub use category_repo::CategoryRepo;
pub use certificate_repo::CertificateRepo;
pub use lookup_repo::{LookupTable, COLORS, CONDITIONS, LOCATIONS, MATERIALS, STATES};
pub use notification_template_repo::NotificationTemplateRepo;
pub use user_repo::UserRepo;
