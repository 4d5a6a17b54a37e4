//! Response rewriting subsystem.
//!
//! # Data Flow
//! ```text
//! Request path:
//!     → assets.rs (static asset? force identity encoding)
//!
//! Origin response:
//!     → cookies.rs (scrub Domain/Secure/SameSite, re-add Secure for https)
//!     → redirect.rs (3xx: move Location onto the public host, stop)
//!     → html.rs (text/html: substitute origins, route links via gateway)
//! ```
//!
//! # Design Decisions
//! - All rewriting is textual; no cookie or HTML parser
//! - Pure functions over strings and header maps, no I/O

pub mod assets;
pub mod cookies;
pub mod html;
pub mod redirect;

pub use assets::is_asset_path;
pub use html::HtmlRewriter;
pub use redirect::{is_redirect, retarget_location};
