//! Seams between the globe and the page around it.

use std::cell::RefCell;
use std::rc::Rc;

use layers::ViewMode;

/// Where the active view is remembered between visits (URL hash in the
/// browser).
pub trait ViewStateBridge {
    fn initial_view(&self) -> ViewMode;
    fn persist_view(&mut self, view: ViewMode);
}

/// View tabs and the heading that names the active view.
pub trait NavigationUi {
    fn set_active_view(&mut self, view: ViewMode);
    fn set_view_label(&mut self, label: &str);
}

/// View state kept as a `#view` fragment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HashViewState {
    hash: String,
}

impl HashViewState {
    pub fn new(hash: impl Into<String>) -> Self {
        Self { hash: hash.into() }
    }

    pub fn hash(&self) -> &str {
        &self.hash
    }
}

impl ViewStateBridge for HashViewState {
    fn initial_view(&self) -> ViewMode {
        ViewMode::from_hash(&self.hash)
    }

    fn persist_view(&mut self, view: ViewMode) {
        self.hash = view.to_hash();
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NoViewState;

impl ViewStateBridge for NoViewState {
    fn initial_view(&self) -> ViewMode {
        ViewMode::default()
    }

    fn persist_view(&mut self, _view: ViewMode) {}
}

/// Records what the navigation should show; adapters read it back after each
/// update.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NavigationState {
    pub active: ViewMode,
    pub label: String,
}

impl NavigationUi for NavigationState {
    fn set_active_view(&mut self, view: ViewMode) {
        self.active = view;
    }

    fn set_view_label(&mut self, label: &str) {
        self.label = label.to_string();
    }
}

impl<T: NavigationUi> NavigationUi for Rc<RefCell<T>> {
    fn set_active_view(&mut self, view: ViewMode) {
        self.borrow_mut().set_active_view(view);
    }

    fn set_view_label(&mut self, label: &str) {
        self.borrow_mut().set_view_label(label);
    }
}

impl<T: ViewStateBridge> ViewStateBridge for Rc<RefCell<T>> {
    fn initial_view(&self) -> ViewMode {
        self.borrow().initial_view()
    }

    fn persist_view(&mut self, view: ViewMode) {
        self.borrow_mut().persist_view(view);
    }
}
