pub mod audit_repo;
pub mod case_repo;
pub mod document_repo;
pub mod template_repo;

pub use audit_repo::DocumentAuditLogRepo;
pub use case_repo::CaseRepo;
pub use document_repo::DocumentRepo;
pub use template_repo::TemplateRepo;
