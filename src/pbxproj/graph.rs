use serde_json::{Map, Value};

use super::{Isa, ObjectId};
use crate::error::{InjectError, InjectResult};

/// One entry of the objects table.
pub type Record = Map<String, Value>;

/// The keyed objects table of a project descriptor.
///
/// Iteration follows key order. When several records match a lookup the
/// first one wins; projects handled here have a single app target.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ObjectGraph {
    objects: Map<String, Value>,
}

impl ObjectGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_map(objects: Map<String, Value>) -> Self {
        Self { objects }
    }

    pub fn to_value(&self) -> Value {
        Value::Object(self.objects.clone())
    }

    pub fn contains(&self, id: &ObjectId) -> bool {
        self.objects.contains_key(id.as_str())
    }

    pub fn get(&self, id: &ObjectId) -> Option<&Record> {
        self.objects.get(id.as_str()).and_then(Value::as_object)
    }

    /// All records that are dictionaries, in key order.
    pub fn records(&self) -> impl Iterator<Item = (ObjectId, &Record)> + '_ {
        self.objects
            .iter()
            .filter_map(|(id, value)| value.as_object().map(|r| (ObjectId::from(id.as_str()), r)))
    }

    /// Records of one variant, in key order.
    pub fn records_of(&self, isa: Isa) -> impl Iterator<Item = (ObjectId, &Record)> + '_ {
        self.records().filter(move |(_, r)| is_a(r, isa))
    }

    /// First record of `isa` whose `name` field equals `name`.
    pub fn find_named(&self, isa: Isa, name: &str) -> Option<ObjectId> {
        self.records_of(isa)
            .find(|(_, r)| str_field(r, "name") == Some(name))
            .map(|(id, _)| id)
    }

    /// An identifier not yet used as a key.
    pub fn fresh_id(&self) -> ObjectId {
        loop {
            let id = ObjectId::generate();
            if !self.contains(&id) {
                return id;
            }
        }
    }

    /// Insert a new record under a fresh identifier and return it.
    pub fn insert_new(&mut self, record: Record) -> ObjectId {
        let id = self.fresh_id();
        self.objects.insert(id.to_string(), Value::Object(record));
        id
    }

    /// Append `item` to the list `field` of record `id`, creating the list if
    /// it is absent.
    pub fn push_to_list(&mut self, id: &ObjectId, field: &'static str, item: &ObjectId) -> InjectResult<()> {
        let record = self
            .objects
            .get_mut(id.as_str())
            .and_then(Value::as_object_mut)
            .ok_or_else(|| InjectError::MalformedRecord {
                id: id.to_string(),
                field: "isa",
            })?;

        let list = record
            .entry(field)
            .or_insert_with(|| Value::Array(Vec::new()))
            .as_array_mut()
            .ok_or_else(|| InjectError::MalformedRecord {
                id: id.to_string(),
                field,
            })?;

        list.push(Value::String(item.to_string()));
        Ok(())
    }

    /// Identifiers listed in `field` of record `id`. A missing field is an
    /// empty list.
    pub fn id_list(&self, id: &ObjectId, field: &'static str) -> InjectResult<Vec<ObjectId>> {
        let Some(record) = self.get(id) else {
            return Ok(Vec::new());
        };
        match record.get(field) {
            None => Ok(Vec::new()),
            Some(Value::Array(items)) => Ok(items
                .iter()
                .filter_map(Value::as_str)
                .map(ObjectId::from)
                .collect()),
            Some(_) => Err(InjectError::MalformedRecord {
                id: id.to_string(),
                field,
            }),
        }
    }

    /// The first resources build phase among the target's `buildPhases`.
    pub fn resources_phase_of(&self, target: &ObjectId) -> InjectResult<Option<ObjectId>> {
        let phases = self.id_list(target, "buildPhases")?;
        Ok(phases.into_iter().find(|phase| {
            self.get(phase)
                .is_some_and(|r| is_a(r, Isa::ResourcesBuildPhase))
        }))
    }
}

/// Find the native target and the group to inject into, in a single scan.
pub fn locate(graph: &ObjectGraph, target_name: &str, group_name: &str) -> InjectResult<(ObjectId, ObjectId)> {
    let mut target = None;
    let mut group = None;

    for (id, record) in graph.records() {
        let name = str_field(record, "name");
        if target.is_none() && is_a(record, Isa::NativeTarget) && name == Some(target_name) {
            target = Some(id);
        } else if group.is_none() && is_a(record, Isa::Group) && name == Some(group_name) {
            group = Some(id);
        }
        if target.is_some() && group.is_some() {
            break;
        }
    }

    let target = target.ok_or_else(|| InjectError::TargetNotFound(target_name.to_string()))?;
    let group = group.ok_or_else(|| InjectError::GroupNotFound(group_name.to_string()))?;
    Ok((target, group))
}

pub fn is_a(record: &Record, isa: Isa) -> bool {
    str_field(record, "isa") == Some(isa.as_str())
}

pub fn str_field<'a>(record: &'a Record, field: &str) -> Option<&'a str> {
    record.get(field).and_then(Value::as_str)
}
