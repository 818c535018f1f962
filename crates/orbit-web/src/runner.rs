use orbit_engine::{EngineConfig, InputEvent, NodeKey, OrbitMap, Point2D, PositionUpdate};

/// Floats per entry in the position-update buffer: key, x, y.
pub const UPDATE_FLOATS: usize = 3;

/// Owns the star map and the flat buffers the host reads after each frame.
///
/// The wasm exports in `lib.rs` keep one runner in a `thread_local!`,
/// because wasm-bindgen cannot export the map type directly.
pub struct MapRunner {
    map: OrbitMap,
    /// Drained position updates as [key, x, y] triples.
    update_buffer: Vec<f64>,
    /// System ids matching `update_buffer`, in the same order.
    update_ids: Vec<String>,
}

impl MapRunner {
    pub fn new(map: OrbitMap) -> Self {
        Self {
            map,
            update_buffer: Vec::with_capacity(UPDATE_FLOATS * 8),
            update_ids: Vec::new(),
        }
    }

    /// Build from a JSON config. An empty string selects the defaults.
    pub fn from_config_json(json: &str) -> Result<Self, String> {
        let map = if json.trim().is_empty() {
            OrbitMap::new(EngineConfig::default())
        } else {
            OrbitMap::from_json(json)
        };
        map.map(Self::new).map_err(|e| e.to_string())
    }

    pub fn map(&self) -> &OrbitMap {
        &self.map
    }

    pub fn load_snapshot(&mut self, json: &str) -> Result<u32, String> {
        self.map.load_json(json).map_err(|e| e.to_string())?;
        Ok(self.map.chart().system_count() as u32)
    }

    pub fn start(&mut self, timestamp_ms: f64) {
        self.map.start(timestamp_ms);
    }

    pub fn stop(&mut self) {
        self.map.stop();
    }

    /// Run one frame, then copy any corrected positions into the update buffer.
    pub fn frame(&mut self, timestamp_ms: f64) -> bool {
        let ran = self.map.frame(timestamp_ms);
        self.collect_updates();
        ran
    }

    pub fn push_input(&mut self, event: InputEvent) {
        self.map.push_input(event);
    }

    /// Queue a drag end for the system with `id`. Returns `false` for ids
    /// missing from the current snapshot; the id is looked up again when
    /// the next frame applies the drag.
    pub fn drag_end(&mut self, id: &str, dx: f64, dy: f64) -> bool {
        if self.system_key(id).is_none() {
            log::warn!("drag end for unknown system {id}");
            return false;
        }
        self.map.push_input(InputEvent::DragEnd {
            system: id.to_string(),
            dx,
            dy,
        });
        true
    }

    /// Place a new empty system at the view center. Applied immediately.
    pub fn place_system(&mut self, id: &str) -> Result<(), String> {
        self.map.place_new_system(id).map_err(|e| e.to_string())?;
        self.collect_updates();
        Ok(())
    }

    pub fn add_planet(&mut self, system_id: &str, planet_id: &str) -> bool {
        let Some(system) = self.system_key(system_id) else {
            return false;
        };
        let added = self.map.add_planet(system, planet_id).is_some();
        self.collect_updates();
        added
    }

    pub fn add_moon(&mut self, system_id: &str, planet_index: u32, moon_id: &str) -> bool {
        let planet = self.map.chart().system_by_id(system_id).and_then(|system| {
            system
                .planets()
                .find(|p| p.sibling_index == planet_index as usize)
                .map(|p| p.key)
        });
        match planet {
            Some(planet) => self.map.add_moon(planet, moon_id).is_some(),
            None => false,
        }
    }

    pub fn world_center(&self) -> Point2D {
        self.map.world_center()
    }

    fn system_key(&self, id: &str) -> Option<NodeKey> {
        self.map.chart().system_by_id(id).map(|s| s.key())
    }

    fn collect_updates(&mut self) {
        let updates = self.map.drain_updates();
        if updates.is_empty() {
            return;
        }
        for PositionUpdate { system, id, position } in updates {
            self.update_buffer
                .extend_from_slice(&[system.0 as f64, position.x, position.y]);
            self.update_ids.push(id);
        }
    }

    /// Forget updates the host has persisted.
    pub fn clear_updates(&mut self) {
        self.update_buffer.clear();
        self.update_ids.clear();
    }

    // ---- Pointer accessors for direct memory reads ----

    pub fn bodies_ptr(&self) -> *const f32 {
        self.map.bodies().instances_ptr()
    }

    pub fn body_count(&self) -> u32 {
        self.map.bodies().instance_count()
    }

    pub fn body_floats(&self) -> &[f32] {
        self.map.bodies().as_floats()
    }

    pub fn updates_ptr(&self) -> *const f64 {
        self.update_buffer.as_ptr()
    }

    /// Number of pending updates (not floats).
    pub fn updates_len(&self) -> u32 {
        self.update_ids.len() as u32
    }

    pub fn update_buffer(&self) -> &[f64] {
        &self.update_buffer
    }

    pub fn update_id(&self, index: u32) -> Option<&str> {
        self.update_ids.get(index as usize).map(String::as_str)
    }
}
