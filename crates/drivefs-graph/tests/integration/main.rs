//! Integration tests for drivefs-graph
//!
//! Uses wiremock to simulate the Microsoft Graph API and the identity
//! platform token endpoint, and verifies end-to-end behavior of the token
//! provider and the storage adapter.


mod test_auth;
mod test_copy_move;
mod test_metadata;
