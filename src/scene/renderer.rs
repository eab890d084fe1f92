//! Renderer - owner of the scene corpus

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use super::Scene;
use crate::identity::{EntityKind, IdAllocator, Identity, RendererId, SceneId};
use crate::{Error, Result};

/// Renderer producing the noisy inputs and reference images for its scenes.
///
/// Deserialization re-attaches every scene through [`Renderer::add_scene`],
/// so duplicate names and scenes linked elsewhere are rejected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawRenderer")]
pub struct Renderer {
    identity: Identity,
    scenes: Vec<Scene>,
    /// Renderer name; also the folder holding its scenes.
    pub name: String,
    /// Renderer executable.
    pub path: PathBuf,
    /// Whether the renderer is built and usable.
    pub is_ready: bool,
}

#[derive(Deserialize)]
struct RawRenderer {
    identity: Identity,
    scenes: Vec<Scene>,
    name: String,
    path: PathBuf,
    is_ready: bool,
}

impl TryFrom<RawRenderer> for Renderer {
    type Error = Error;

    fn try_from(raw: RawRenderer) -> Result<Self> {
        let mut renderer = Self {
            identity: raw.identity,
            scenes: Vec::with_capacity(raw.scenes.len()),
            name: raw.name,
            path: raw.path,
            is_ready: raw.is_ready,
        };
        for scene in raw.scenes {
            if let Some(owner) = scene.renderer().filter(|&owner| owner != renderer.id()) {
                return Err(Error::OwnerMismatch {
                    child: scene.id().to_string(),
                    owner: owner.to_string(),
                    parent: renderer.id().to_string(),
                });
            }
            renderer.add_scene(scene)?;
        }
        Ok(renderer)
    }
}

impl Renderer {
    /// Create a renderer with no scenes.
    pub fn new(ids: &IdAllocator, name: impl Into<String>) -> Self {
        Self {
            identity: ids.identity(EntityKind::Renderer),
            scenes: Vec::new(),
            name: name.into(),
            path: PathBuf::new(),
            is_ready: false,
        }
    }

    /// Renderer handle.
    #[must_use]
    pub const fn id(&self) -> RendererId {
        RendererId::new(self.identity)
    }

    /// Session identifier.
    #[must_use]
    pub const fn uuid(&self) -> Uuid {
        self.identity.uuid()
    }

    /// Scenes in insertion order.
    #[must_use]
    pub fn scenes(&self) -> &[Scene] {
        &self.scenes
    }

    /// Take ownership of `scene` and point its back-reference here.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DuplicateScene`] if a scene with the same name exists.
    pub fn add_scene(&mut self, mut scene: Scene) -> Result<&mut Scene> {
        if self.get_scene(&scene.name).is_some() {
            return Err(Error::DuplicateScene {
                renderer: self.name.clone(),
                scene: scene.name,
            });
        }
        scene.link_renderer(self.id());
        debug!(renderer = %self.name, scene = %scene.name, id = %scene.id(), "scene added");
        let idx = self.scenes.len();
        self.scenes.push(scene);
        Ok(&mut self.scenes[idx])
    }

    /// Allocate a scene named `name` and add it.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DuplicateScene`] if a scene with the same name exists.
    pub fn new_scene(&mut self, ids: &IdAllocator, name: impl Into<String>) -> Result<&mut Scene> {
        self.add_scene(Scene::new(ids, name))
    }

    /// Find a scene by name.
    #[must_use]
    pub fn get_scene(&self, name: &str) -> Option<&Scene> {
        self.scenes.iter().find(|s| s.name == name)
    }

    /// Find a scene by name for mutation.
    pub fn get_scene_mut(&mut self, name: &str) -> Option<&mut Scene> {
        self.scenes.iter_mut().find(|s| s.name == name)
    }

    /// Find a scene by handle.
    #[must_use]
    pub fn get_scene_by_id(&self, id: SceneId) -> Option<&Scene> {
        self.scenes.iter().find(|s| s.id() == id)
    }

    /// Reference image of an owned scene, or `None` if the scene is not here.
    ///
    /// # Errors
    ///
    /// Propagates [`Scene::get_reference`] failures.
    pub fn scene_reference(&self, id: SceneId) -> Result<Option<PathBuf>> {
        self.get_scene_by_id(id)
            .map(|scene| scene.get_reference(self))
            .transpose()
    }
}
