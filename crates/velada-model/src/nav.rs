use crate::account::RecordId;
use crate::session::SessionState;

/// Application routes, one per page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Landing,
    Login,
    Register,
    EventsList,
    EventDetail(RecordId),
    CreateEvent,
}

impl Route {
    #[must_use]
    pub fn path(&self) -> String {
        match self {
            Self::Landing => "/".to_string(),
            Self::Login => "/login".to_string(),
            Self::Register => "/register".to_string(),
            Self::EventsList => "/events-list".to_string(),
            Self::EventDetail(id) => format!("/evento/{}", id.as_str()),
            Self::CreateEvent => "/create".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavEntry {
    Goto {
        label: &'static str,
        route: Route,
    },
    /// Clears the session rather than navigating.
    Logout {
        label: &'static str,
    },
}

/// Navigation entries for the current session. Event detail pages are
/// reached from the listing, never from the bar.
#[must_use]
pub fn visible_links(session: &SessionState) -> Vec<NavEntry> {
    let mut entries = vec![
        NavEntry::Goto {
            label: "Inicio",
            route: Route::Landing,
        },
        NavEntry::Goto {
            label: "Eventos",
            route: Route::EventsList,
        },
    ];
    if session.is_authenticated() {
        entries.push(NavEntry::Goto {
            label: "Crear Evento",
            route: Route::CreateEvent,
        });
        entries.push(NavEntry::Logout {
            label: "Cerrar Sesión",
        });
    } else {
        entries.push(NavEntry::Goto {
            label: "Iniciar Sesión",
            route: Route::Login,
        });
        entries.push(NavEntry::Goto {
            label: "Registrarse",
            route: Route::Register,
        });
    }
    entries
}
