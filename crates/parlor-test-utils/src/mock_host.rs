// SPDX-FileCopyrightText: 2026 Parlor Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock embedding-host collaborators: notification capture, navigation
//! capture, and a fixed-settings config source.

use std::sync::Mutex;

use async_trait::async_trait;

use parlor_core::error::ParlorError;
use parlor_core::traits::{ConfigSource, HostNotifier, Navigator};
use parlor_core::types::{HostEvent, Route, WidgetSettings};

/// Captures every event notified to the embedding host.
#[derive(Default)]
pub struct MockHost {
    events: Mutex<Vec<HostEvent>>,
}

impl MockHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<HostEvent> {
        self.events.lock().map(|e| e.clone()).unwrap_or_default()
    }

    /// Event callback names in notification order.
    pub fn event_names(&self) -> Vec<&'static str> {
        self.events().iter().map(HostEvent::name).collect()
    }
}

impl HostNotifier for MockHost {
    fn notify(&self, event: HostEvent) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event);
        }
    }
}

/// Captures every navigation the controller performs.
#[derive(Default)]
pub struct MockNavigator {
    routes: Mutex<Vec<Route>>,
}

impl MockNavigator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn routes(&self) -> Vec<Route> {
        self.routes.lock().map(|r| r.clone()).unwrap_or_default()
    }
}

impl Navigator for MockNavigator {
    fn navigate(&self, route: Route) {
        if let Ok(mut routes) = self.routes.lock() {
            routes.push(route);
        }
    }
}

/// Config source returning a fixed settings snapshot.
pub struct MockConfigSource {
    settings: Mutex<WidgetSettings>,
}

impl MockConfigSource {
    pub fn new(settings: WidgetSettings) -> Self {
        Self {
            settings: Mutex::new(settings),
        }
    }

    /// Replaces the settings returned by subsequent loads.
    pub fn set_settings(&self, settings: WidgetSettings) {
        if let Ok(mut current) = self.settings.lock() {
            *current = settings;
        }
    }
}

impl Default for MockConfigSource {
    fn default() -> Self {
        Self::new(WidgetSettings::default())
    }
}

#[async_trait]
impl ConfigSource for MockConfigSource {
    async fn load(&self) -> Result<WidgetSettings, ParlorError> {
        self.settings
            .lock()
            .map(|s| *s)
            .map_err(|_| ParlorError::Internal("settings lock poisoned".into()))
    }
}
