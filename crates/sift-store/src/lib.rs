//! Persistence for the sift relay.
//!
//! A narrow key-value object-store trait with filesystem and in-memory
//! backends, the configuration repository on top of it, and the day-keyed
//! audit log with its retention policy.

pub mod audit_log;
pub mod config_repository;
pub mod object_store;

pub use audit_log::{AuditLog, LOG_KEY_PREFIX, LOG_RETENTION_DAYS};
pub use config_repository::ConfigRepository;
pub use object_store::{FsObjectStore, MemoryObjectStore, ObjectStore};
