use std::sync::atomic::{AtomicBool, Ordering};

// AuthService is the admin-credential collaborator; the engine only asks whether an admin
// session is currently active.
pub trait AuthService: Sync + Send {
    fn is_admin_session_active(&self) -> bool;
}

// SessionAuthService keeps a single in-process admin session flag.
#[derive(Debug, Default)]
pub struct SessionAuthService {
    active: AtomicBool,
}

impl SessionAuthService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn logged_in() -> Self {
        Self { active: AtomicBool::new(true) }
    }

    pub fn login(&self) {
        self.active.store(true, Ordering::SeqCst);
    }

    pub fn logout(&self) {
        self.active.store(false, Ordering::SeqCst);
    }
}

impl AuthService for SessionAuthService {
    fn is_admin_session_active(&self) -> bool {
        self.active.load(Ordering::SeqCst)
    }
}
