//! Session lifecycle: cookie value type, file persistence, liveness probe,
//! interactive browser login, and the manager that orchestrates them.

pub mod cookie;
pub mod login;
pub mod manager;
pub mod probe;
pub mod store;

pub use cookie::{Session, COOKIE_ALLOW_LIST, XSRF_COOKIE};
pub use login::{BrowserLogin, InteractiveLogin, MockLogin};
pub use manager::SessionManager;
pub use probe::{HttpSessionProbe, MockSessionProbe, SessionProbe};
pub use store::CookieStore;
