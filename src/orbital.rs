//! Radial timeline menu.
//!
//! Items sit evenly spaced on a circle that slowly spins. Clicking a node
//! expands it, stops the spin, rotates the ring so the node faces the
//! viewer and highlights the items it relates to. At most one node is ever
//! expanded; the expanded node is simply `active_id`, so exclusivity holds
//! by construction.

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashSet};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ItemStatus {
    Completed,
    InProgress,
    Pending,
}

/// One timeline entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrbitalItem {
    pub id: u32,
    pub title: String,
    pub date: String,
    pub content: String,
    pub category: String,
    pub related_ids: Vec<u32>,
    pub status: ItemStatus,
    /// 0..=100, drives the node glow size.
    pub energy: u32,
}

impl OrbitalItem {
    fn new(id: u32, title: &str, date: &str, content: &str, related_ids: &[u32], status: ItemStatus, energy: u32) -> Self {
        Self {
            id,
            title: title.to_string(),
            date: date.to_string(),
            content: content.to_string(),
            category: title.to_string(),
            related_ids: related_ids.to_vec(),
            status,
            energy,
        }
    }
}

/// The five-stage project timeline shown on the landing page.
pub fn default_timeline() -> Vec<OrbitalItem> {
    vec![
        OrbitalItem::new(1, "Planning", "2024-01", "Project planning and requirements.", &[2], ItemStatus::Completed, 100),
        OrbitalItem::new(2, "Design", "2024-02", "UI/UX design and system architecture.", &[1, 3], ItemStatus::Completed, 90),
        OrbitalItem::new(3, "Development", "2024-03", "Core features and unit tests.", &[2, 4], ItemStatus::InProgress, 60),
        OrbitalItem::new(4, "Testing", "2024-04", "User testing and bug fixes.", &[3, 5], ItemStatus::Pending, 30),
        OrbitalItem::new(5, "Release", "2024-05", "Deployment and launch.", &[4], ItemStatus::Pending, 10),
    ]
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrbitalConfig {
    /// Orbit radius in layout units.
    pub radius: f32,
    /// Degrees added per tick while auto-rotating.
    pub rotation_step: f32,
    /// Seconds per rotation tick.
    pub tick: f32,
    /// Angle, in degrees, an expanded node is rotated to.
    pub focus_angle: f32,
}

impl Default for OrbitalConfig {
    fn default() -> Self {
        Self {
            radius: 90.0,
            rotation_step: 0.5,
            tick: 0.05,
            focus_angle: 270.0,
        }
    }
}

/// Layout of one node at the current rotation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrbitalNode {
    pub id: u32,
    /// Degrees in `[0, 360)`.
    pub angle: f32,
    pub x: f32,
    pub y: f32,
    pub z_index: i32,
    pub opacity: f32,
}

/// Everything a renderer needs to draw a node.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NodeView {
    pub node: OrbitalNode,
    pub expanded: bool,
    pub related: bool,
    pub pulsing: bool,
    pub glow_diameter: f32,
}

/// What a click landed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickTarget {
    Node(u32),
    Background,
}

#[derive(Debug, Clone)]
pub struct OrbitalMenu {
    items: Vec<OrbitalItem>,
    config: OrbitalConfig,
    rotation: f32,
    auto_rotate: bool,
    active: Option<u32>,
    pulsing: BTreeSet<u32>,
    tick_accum: f32,
}

impl OrbitalMenu {
    pub fn new(mut items: Vec<OrbitalItem>, config: OrbitalConfig) -> Result<Self, ConfigError> {
        if items.is_empty() {
            return Err(ConfigError::EmptyOrbit);
        }
        if !config.radius.is_finite() || !config.rotation_step.is_finite() || !config.focus_angle.is_finite() {
            return Err(ConfigError::NotFinite("orbital config"));
        }
        if config.radius <= 0.0 {
            return Err(ConfigError::NonPositiveRadius(config.radius));
        }
        if !(config.tick > 0.0) || !config.tick.is_finite() {
            return Err(ConfigError::NonPositiveDuration { what: "orbital tick", value: config.tick });
        }

        let mut seen = HashSet::new();
        for item in &mut items {
            if !seen.insert(item.id) {
                return Err(ConfigError::DuplicateItem(item.id));
            }
            let id = item.id;
            if item.related_ids.contains(&id) {
                log::warn!("orbital item {id} lists itself as related, ignoring");
                item.related_ids.retain(|r| *r != id);
            }
        }

        Ok(Self {
            items,
            config,
            rotation: 0.0,
            auto_rotate: true,
            active: None,
            pulsing: BTreeSet::new(),
            tick_accum: 0.0,
        })
    }

    /// Layout of the node at `index`, or `None` past the end.
    pub fn node_position(&self, index: usize) -> Option<OrbitalNode> {
        let item = self.items.get(index)?;
        let total = self.items.len() as f32;
        let angle = ((index as f32 / total) * 360.0 + self.rotation).rem_euclid(360.0);
        let rad = angle.to_radians();
        let (sin, cos) = rad.sin_cos();
        Some(OrbitalNode {
            id: item.id,
            angle,
            x: self.config.radius * cos,
            y: self.config.radius * sin,
            z_index: (100.0 + 50.0 * sin).round() as i32,
            opacity: (0.4 + 0.6 * ((1.0 + sin) / 2.0)).clamp(0.4, 1.0),
        })
    }

    /// Every node with its interaction flags.
    pub fn nodes(&self) -> Vec<NodeView> {
        self.items
            .iter()
            .enumerate()
            .filter_map(|(index, item)| {
                let mut node = self.node_position(index)?;
                let expanded = self.is_expanded(item.id);
                if expanded {
                    node.z_index = 200;
                    node.opacity = 1.0;
                }
                Some(NodeView {
                    node,
                    expanded,
                    related: self.is_related(item.id),
                    pulsing: self.pulsing.contains(&item.id),
                    glow_diameter: item.energy as f32 * 0.5 + 40.0,
                })
            })
            .collect()
    }

    /// Apply a click. Returns whether any state changed.
    pub fn click(&mut self, target: ClickTarget) -> bool {
        match target {
            ClickTarget::Background => {
                let changed = self.active.is_some() || !self.auto_rotate;
                self.clear();
                changed
            }
            ClickTarget::Node(id) if self.active == Some(id) => {
                self.clear();
                true
            }
            ClickTarget::Node(id) => {
                let Some(index) = self.items.iter().position(|item| item.id == id) else {
                    log::debug!("click on unknown orbital node {id}");
                    return false;
                };
                // Collapse fully before expanding the new node.
                self.clear();
                self.active = Some(id);
                self.auto_rotate = false;
                self.pulsing = self.items[index].related_ids.iter().copied().collect();
                let total = self.items.len() as f32;
                self.rotation = (self.config.focus_angle - index as f32 / total * 360.0).rem_euclid(360.0);
                log::debug!("orbital node {id} expanded, rotation {:.1}", self.rotation);
                true
            }
        }
    }

    fn clear(&mut self) {
        self.active = None;
        self.pulsing.clear();
        self.auto_rotate = true;
        self.tick_accum = 0.0;
    }

    /// Advance the auto-rotation by whole ticks of elapsed time.
    pub fn update(&mut self, dt: f32) {
        if !self.auto_rotate {
            return;
        }
        self.tick_accum += dt.max(0.0);
        let tick = self.config.tick;
        let remainder = self.tick_accum.rem_euclid(tick);
        let ticks = ((self.tick_accum - remainder) / tick).round();
        self.tick_accum = remainder;
        if ticks > 0.0 {
            let turn = (f64::from(ticks) * f64::from(self.config.rotation_step)).rem_euclid(360.0) as f32;
            self.rotation = (self.rotation + turn).rem_euclid(360.0);
        }
    }

    pub fn active_id(&self) -> Option<u32> {
        self.active
    }

    pub fn is_expanded(&self, id: u32) -> bool {
        self.active == Some(id)
    }

    /// Whether `id` is listed as related by the expanded node.
    pub fn is_related(&self, id: u32) -> bool {
        self.active
            .and_then(|active| self.item(active))
            .is_some_and(|item| item.related_ids.contains(&id))
    }

    pub fn rotation_angle(&self) -> f32 {
        self.rotation
    }

    /// Force the rotation, normalised to `[0, 360)`.
    pub fn set_rotation_angle(&mut self, degrees: f32) {
        self.rotation = degrees.rem_euclid(360.0);
    }

    pub fn auto_rotate(&self) -> bool {
        self.auto_rotate
    }

    pub fn item(&self, id: u32) -> Option<&OrbitalItem> {
        self.items.iter().find(|item| item.id == id)
    }

    pub fn items(&self) -> &[OrbitalItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
