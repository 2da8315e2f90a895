use std::collections::HashMap;

use indexmap::IndexMap;

use crate::{
    CLASS_PREFIX, Class, Element, ElementData, ElementKind, ElementPtr, Event, Manifest,
    ManifestError, Method, Routine, RoutineKind, State, StateMode,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoutineDef {
    pub ptr: ElementPtr,
    pub kind: RoutineKind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodDef {
    pub ptr: ElementPtr,
    pub class: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EventDef {
    pub ptr: ElementPtr,
    pub topics: u32,
}

/// Which state regions a logic declares, and where.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StateMatrix {
    persistent: Option<ElementPtr>,
    ephemeral: Option<ElementPtr>,
}

impl StateMatrix {
    pub fn get(&self, mode: StateMode) -> Option<ElementPtr> {
        match mode {
            StateMode::Persistent => self.persistent,
            StateMode::Ephemeral => self.ephemeral,
        }
    }

    pub fn has(&self, mode: StateMode) -> bool {
        self.get(mode).is_some()
    }

    fn set(&mut self, mode: StateMode, ptr: ElementPtr) -> Option<ElementPtr> {
        let slot = match mode {
            StateMode::Persistent => &mut self.persistent,
            StateMode::Ephemeral => &mut self.ephemeral,
        };
        slot.replace(ptr)
    }
}

/// Read-only lookup tables over a manifest's flat element list.
///
/// Later elements win when two share a name; the replacement is logged.
#[derive(Debug, Clone, Default)]
pub struct ManifestIndex {
    elements: IndexMap<ElementPtr, Element>,
    classes: HashMap<String, ElementPtr>,
    methods: HashMap<String, MethodDef>,
    routines: HashMap<String, RoutineDef>,
    events: HashMap<String, EventDef>,
    states: StateMatrix,
}

impl ManifestIndex {
    pub fn new(elements: impl IntoIterator<Item = Element>) -> Self {
        let mut index = ManifestIndex::default();
        for element in elements {
            index.insert(element);
        }
        index
    }

    fn insert(&mut self, element: Element) {
        let ptr = element.ptr;
        let replaced = match &element.data {
            ElementData::Class(class) => self
                .classes
                .insert(format!("{CLASS_PREFIX}{}", class.name), ptr)
                .map(|old| (class.name.clone(), old)),
            ElementData::Method(method) => self
                .methods
                .insert(
                    method.name.clone(),
                    MethodDef {
                        ptr,
                        class: method.class.clone(),
                    },
                )
                .map(|old| (method.name.clone(), old.ptr)),
            ElementData::Routine(routine) => self
                .routines
                .insert(
                    routine.name.clone(),
                    RoutineDef {
                        ptr,
                        kind: routine.kind,
                    },
                )
                .map(|old| (routine.name.clone(), old.ptr)),
            ElementData::Event(event) => self
                .events
                .insert(
                    event.name.clone(),
                    EventDef {
                        ptr,
                        topics: event.topics,
                    },
                )
                .map(|old| (event.name.clone(), old.ptr)),
            ElementData::State(state) => self
                .states
                .set(state.mode, ptr)
                .map(|old| (state.mode.to_string(), old)),
            _ => None,
        };
        if let Some((name, old)) = replaced {
            tracing::warn!(
                kind = %element.kind(),
                name = %name,
                previous = old,
                current = ptr,
                "duplicate manifest element replaces earlier definition"
            );
        }
        if self.elements.insert(ptr, element).is_some() {
            tracing::warn!(ptr, "duplicate element pointer replaces earlier element");
        }
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn elements(&self) -> impl Iterator<Item = &Element> {
        self.elements.values()
    }

    pub fn element(&self, ptr: ElementPtr) -> Result<&Element, ManifestError> {
        self.elements
            .get(&ptr)
            .ok_or(ManifestError::UnknownElement(ptr))
    }

    pub fn states(&self) -> StateMatrix {
        self.states
    }

    pub fn routine_def(&self, name: &str) -> Result<RoutineDef, ManifestError> {
        self.routines
            .get(name)
            .copied()
            .ok_or_else(|| not_found(ElementKind::Routine, name))
    }

    pub fn method_def(&self, name: &str) -> Result<&MethodDef, ManifestError> {
        self.methods
            .get(name)
            .ok_or_else(|| not_found(ElementKind::Method, name))
    }

    pub fn event_def(&self, name: &str) -> Result<EventDef, ManifestError> {
        self.events
            .get(name)
            .copied()
            .ok_or_else(|| not_found(ElementKind::Event, name))
    }

    pub fn routine_element(&self, name: &str) -> Result<&Element, ManifestError> {
        self.element(self.routine_def(name)?.ptr)
    }

    pub fn method_element(&self, name: &str) -> Result<&Element, ManifestError> {
        self.element(self.method_def(name)?.ptr)
    }

    pub fn event_element(&self, name: &str) -> Result<&Element, ManifestError> {
        self.element(self.event_def(name)?.ptr)
    }

    /// Accepts `class.Name` or bare `Name`.
    pub fn class_element(&self, name: &str) -> Result<&Element, ManifestError> {
        let key = if name.starts_with(CLASS_PREFIX) {
            name.to_owned()
        } else {
            format!("{CLASS_PREFIX}{name}")
        };
        let ptr = self
            .classes
            .get(&key)
            .ok_or_else(|| not_found(ElementKind::Class, name))?;
        self.element(*ptr)
    }

    pub fn state_element(&self, mode: StateMode) -> Result<&Element, ManifestError> {
        let ptr = self
            .states
            .get(mode)
            .ok_or_else(|| not_found(ElementKind::State, &mode.to_string()))?;
        self.element(ptr)
    }

    pub fn routine(&self, name: &str) -> Result<&Routine, ManifestError> {
        let element = self.routine_element(name)?;
        expect_kind(element, ElementKind::Routine, Element::as_routine)
    }

    pub fn method(&self, name: &str) -> Result<&Method, ManifestError> {
        let element = self.method_element(name)?;
        expect_kind(element, ElementKind::Method, Element::as_method)
    }

    pub fn event(&self, name: &str) -> Result<&Event, ManifestError> {
        let element = self.event_element(name)?;
        expect_kind(element, ElementKind::Event, Element::as_event)
    }

    pub fn class(&self, name: &str) -> Result<&Class, ManifestError> {
        let element = self.class_element(name)?;
        expect_kind(element, ElementKind::Class, Element::as_class)
    }

    pub fn state(&self, mode: StateMode) -> Result<&State, ManifestError> {
        let element = self.state_element(mode)?;
        expect_kind(element, ElementKind::State, Element::as_state)
    }

    /// Methods bound to `class`, in manifest order.
    pub fn class_methods(&self, class: &str) -> Vec<&Method> {
        let name = class.strip_prefix(CLASS_PREFIX).unwrap_or(class);
        self.elements
            .values()
            .filter_map(Element::as_method)
            .filter(|method| method.class.strip_prefix(CLASS_PREFIX).unwrap_or(&method.class) == name)
            .collect()
    }
}

impl From<&Manifest> for ManifestIndex {
    fn from(manifest: &Manifest) -> Self {
        ManifestIndex::new(manifest.elements.iter().cloned())
    }
}

fn not_found(kind: ElementKind, name: &str) -> ManifestError {
    ManifestError::NotFound {
        kind,
        name: name.to_owned(),
    }
}

fn expect_kind<'a, T>(
    element: &'a Element,
    expected: ElementKind,
    project: impl FnOnce(&'a Element) -> Option<&'a T>,
) -> Result<&'a T, ManifestError> {
    project(element).ok_or(ManifestError::KindMismatch {
        ptr: element.ptr,
        expected,
        found: element.kind(),
    })
}
