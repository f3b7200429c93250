//! Shell construction: an empty result of the right kind and type, before
//! any contents are filled in.

use overlay_types::{Composite, MapObject, Object, Prototype, Record, Sequence, SetObject};

use crate::error::{MergeError, MergeResult};

/// Allocate the shell for a merge whose last argument is `last`.
///
/// Callables and host handles are their own shell: the source handle is
/// returned unchanged.
pub(crate) fn construct(last: &Object, prototype: Prototype) -> MergeResult<Object> {
    let composite = match &*last.borrow() {
        Composite::Sequence(seq) => Composite::Sequence(Sequence::holes(seq.family.clone(), seq.len())),
        Composite::Map(map) => Composite::Map(MapObject::empty(map.family.clone())),
        Composite::Set(set) => Composite::Set(SetObject::empty(set.family.clone())),
        Composite::Boxed(boxed) => Composite::Boxed(boxed.clone()),
        Composite::Pattern(pattern) => Composite::Pattern(pattern.clone()),
        Composite::Record(record) => {
            if record.prototype.is_constructible() {
                Composite::Record(Record::with_prototype(prototype))
            } else {
                Composite::Record(Record::plain())
            }
        }
        Composite::Callable(_) | Composite::Host(_) => return Ok(last.clone()),
        Composite::Foreign(foreign) => return Err(MergeError::unsupported(foreign.tag.clone())),
    };
    Ok(Object::new(composite))
}
