//! Process plumbing shared by the tablefind binaries: settings, logging,
//! startup of the shared read-only resources, and the HTTP router.
pub mod server;
pub mod setup;
