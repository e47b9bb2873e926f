//! Which section and tab are visible, held as one value.
//!
//! The DOM classes are derived from [`ViewState`]; nothing reads them back.

use crate::config::DASHBOARD_PATH;
use std::rc::Rc;
use yew::prelude::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Home,
    Dashboard,
}

impl Section {
    /// The dashboard is served at its own path; everything else is home.
    pub fn from_path(path: &str) -> Self {
        if path.trim_end_matches('/') == DASHBOARD_PATH {
            Section::Dashboard
        } else {
            Section::Home
        }
    }

    pub fn id(self) -> &'static str {
        match self {
            Section::Home => "home",
            Section::Dashboard => "dashboard",
        }
    }
}

/// Tab panels of the home section.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Login,
    Register,
    ForgotPassword,
    Upload,
}

impl Tab {
    pub const ALL: [Tab; 4] = [Tab::Login, Tab::Register, Tab::ForgotPassword, Tab::Upload];

    pub fn id(self) -> &'static str {
        match self {
            Tab::Login => "login",
            Tab::Register => "register",
            Tab::ForgotPassword => "forgot",
            Tab::Upload => "upload",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Tab::Login => "Login",
            Tab::Register => "Register",
            Tab::ForgotPassword => "Forgot password",
            Tab::Upload => "Upload",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewAction {
    ShowSection(Section),
    /// The tab whose link was activated, passed explicitly.
    ShowTab(Tab),
    ToggleMenu,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewState {
    pub section: Section,
    pub tab: Tab,
    pub menu_open: bool,
}

impl ViewState {
    pub fn new(section: Section) -> Self {
        Self {
            section,
            tab: Tab::Login,
            menu_open: false,
        }
    }

    pub fn apply(self, action: ViewAction) -> Self {
        match action {
            ViewAction::ShowSection(section) => Self { section, ..self },
            ViewAction::ShowTab(tab) => Self { tab, ..self },
            ViewAction::ToggleMenu => Self {
                menu_open: !self.menu_open,
                ..self
            },
        }
    }

    pub fn section_class(&self, section: Section) -> Classes {
        classes!("section", (self.section == section).then_some("active"))
    }

    pub fn tab_panel_class(&self, tab: Tab) -> Classes {
        classes!("tab-panel", (self.tab == tab).then_some("active"))
    }

    /// Class of the `<li>` wrapping a tab link.
    pub fn tab_link_item_class(&self, tab: Tab) -> Classes {
        classes!((self.tab == tab).then_some("active"))
    }

    pub fn nav_list_class(&self) -> Classes {
        classes!("nav-list", self.menu_open.then_some("active"))
    }
}

impl Reducible for ViewState {
    type Action = ViewAction;

    fn reduce(self: Rc<Self>, action: Self::Action) -> Rc<Self> {
        Rc::new((*self).apply(action))
    }
}
