pub mod replay;

use serde::{Deserialize, Serialize};

use crate::page::{ElementId, VISIBLE_CLASS};
use crate::shelf::Shelf;
use crate::toolkit::{KeyValueStorage, ToolkitError};

/// Where a toolkit toggle was clicked.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ToggleOrigin {
    #[default]
    Grid,
    Sidebar,
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum Event {
    SearchInput {
        value: String,
    },
    Click {
        target: ElementId,
    },
    ToggleResource {
        id: String,
        #[serde(default)]
        origin: ToggleOrigin,
    },
    Scroll {
        offset_y: f64,
    },
    NewsletterSubmit,
}

/// Work left for the host after an event has been handled.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "effect", rename_all = "snake_case")]
pub enum Effect {
    None,
    ScrollToTop { smooth: bool },
    Notice { message: String },
}

impl<S: KeyValueStorage> Shelf<S> {
    pub fn dispatch(&mut self, event: &Event) -> Result<Effect, ToolkitError> {
        tracing::debug!(?event, "dispatch");
        match event {
            Event::SearchInput { value } => {
                let Some(input) = self.bindings().search_input.clone() else {
                    return Ok(Effect::None);
                };
                self.page_mut().set_value(&input, value);
                self.search(value);
                Ok(Effect::None)
            }
            Event::Click { target } => Ok(self.on_click(target)),
            Event::ToggleResource { id, origin } => {
                self.toggle(id)?;
                if *origin == ToggleOrigin::Grid {
                    self.close_sidebar();
                }
                Ok(Effect::None)
            }
            Event::Scroll { offset_y } => {
                self.on_scroll(*offset_y);
                Ok(Effect::None)
            }
            Event::NewsletterSubmit => Ok(self.on_newsletter_submit()),
        }
    }

    fn on_click(&mut self, target: &ElementId) -> Effect {
        let mut effect = Effect::None;

        if let Some(sidebar) = self.bindings().sidebar.clone() {
            if self.page().contains(&sidebar.button, target) {
                self.open_sidebar();
            } else if self.page().contains(&sidebar.close, target) {
                self.close_sidebar();
            }
        }

        if let Some(scroll) = self.bindings().scroll_to_top.as_ref() {
            if self.page().contains(scroll, target) {
                effect = Effect::ScrollToTop { smooth: true };
            }
        }

        if let Some(sidebar) = self.bindings().sidebar.clone() {
            let inside = self.page().contains(&sidebar.panel, target)
                || self.page().contains(&sidebar.button, target);
            if !inside {
                self.close_sidebar();
            }
        }

        effect
    }

    fn on_scroll(&mut self, offset_y: f64) {
        let Some(button) = self.bindings().scroll_to_top.clone() else {
            return;
        };
        if offset_y > self.settings().scroll_threshold {
            self.page_mut().add_class(&button, VISIBLE_CLASS);
        } else {
            self.page_mut().remove_class(&button, VISIBLE_CLASS);
        }
    }

    fn on_newsletter_submit(&mut self) -> Effect {
        let Some(newsletter) = self.bindings().newsletter.clone() else {
            return Effect::None;
        };
        if let Some(email) = newsletter.email.as_ref() {
            self.page_mut().set_value(email, "");
        }
        Effect::Notice {
            message: self.settings().newsletter_notice.clone(),
        }
    }
}
