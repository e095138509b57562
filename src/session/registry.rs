use indexmap::IndexMap;
use livequery_api::ResultComponent;

/// The consumers currently attached to a session, keyed by component id.
#[derive(Default)]
pub struct ComponentRegistry {
    components: IndexMap<String, Box<dyn ResultComponent>>,
}

impl ComponentRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach a consumer, returning the one previously registered under `id`.
    pub fn insert(
        &mut self,
        id: impl Into<String>,
        component: Box<dyn ResultComponent>,
    ) -> Option<Box<dyn ResultComponent>> {
        self.components.insert(id.into(), component)
    }

    pub fn remove(&mut self, id: &str) -> Option<Box<dyn ResultComponent>> {
        self.components.shift_remove(id)
    }

    pub fn get(&self, id: &str) -> Option<&dyn ResultComponent> {
        self.components.get(id).map(|component| component.as_ref())
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut (dyn ResultComponent + 'static)> {
        self.components.get_mut(id).map(|component| component.as_mut())
    }

    pub fn contains(&self, id: &str) -> bool {
        self.components.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.components.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &dyn ResultComponent)> {
        self.components
            .iter()
            .map(|(id, component)| (id.as_str(), component.as_ref()))
    }

    /// Visit every consumer once, in registration order.
    pub fn for_each_mut(&mut self, mut f: impl FnMut(&str, &mut dyn ResultComponent)) {
        for (id, component) in &mut self.components {
            f(id, component.as_mut());
        }
    }

    pub fn set_wants_data(&mut self, wants_data: bool) {
        self.for_each_mut(|_, component| component.set_wants_data(wants_data));
    }
}

impl std::fmt::Debug for ComponentRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.components.keys()).finish()
    }
}
