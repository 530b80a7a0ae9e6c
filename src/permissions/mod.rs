//! Permission system for checking user roles.
//!
//! - `checker` talks to the platform (live admin lists)
//! - `guards` wraps command branches: group-only, admin-only, owner-only
//!
//! ## Usage
//!
//! ```rust,ignore
//! case![Command::Ban]
//!     .chain(guards::group_only())
//!     .chain(guards::admin_only())
//!     .endpoint(ban::ban_command)
//! ```

mod checker;
pub mod guards;

pub use checker::{Permissions, human_admins};
