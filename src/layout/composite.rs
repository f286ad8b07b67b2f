//! Temporary grouping of shapes so they move, rotate and scale as one
//!
//! A [`CompositeUnit`] wraps its members in a host group and remembers
//! where each member came from. Releasing the unit puts every member back
//! in its original container, in its original relative order, and
//! deletes the group.

use tracing::warn;

use crate::host::{CanvasHost, Container, Placement, ShapeId};

use super::error::LayoutError;
use super::kernel::bounds_of;
use super::types::BoundingBox;

#[derive(Debug, Clone, Copy, PartialEq)]
struct Member {
    shape: ShapeId,
    origin: Container,
}

/// A set of shapes grouped in the host for the duration of a transform
#[derive(Debug)]
pub struct CompositeUnit {
    group: ShapeId,
    members: Vec<Member>,
    released: bool,
}

impl CompositeUnit {
    /// Group `members` into a new host group.
    ///
    /// The group lives in the container of `anchor` (right after it) or,
    /// without an anchor, is appended to the first member's container.
    pub fn group<H: CanvasHost + ?Sized>(
        host: &mut H,
        members: &[ShapeId],
        anchor: Option<ShapeId>,
    ) -> Result<Self, LayoutError> {
        let first = members.first().ok_or_else(|| {
            LayoutError::invalid_parameter("members", "a composite unit needs at least one shape")
        })?;
        let recorded = members
            .iter()
            .map(|shape| {
                Ok(Member {
                    shape: *shape,
                    origin: host.container_of(*shape)?,
                })
            })
            .collect::<Result<Vec<_>, LayoutError>>()?;
        let container = match anchor {
            Some(a) => host.container_of(a)?,
            None => host.container_of(*first)?,
        };

        let group = host.create_group(container, anchor)?;
        let mut unit = Self {
            group,
            members: recorded,
            released: false,
        };
        for shape in members {
            if let Err(e) =
                host.move_into_container(*shape, Container::Group(group), None, Placement::Inside)
            {
                unit.release_after_failure(host);
                return Err(e);
            }
        }
        Ok(unit)
    }

    /// Take over an existing host group, such as a duplicated unit.
    ///
    /// Its current children become the members and the group's own
    /// container is recorded as their origin.
    pub fn adopt<H: CanvasHost + ?Sized>(host: &H, group: ShapeId) -> Result<Self, LayoutError> {
        let origin = host.container_of(group)?;
        let members = host
            .children(Container::Group(group))?
            .into_iter()
            .map(|shape| Member { shape, origin })
            .collect();
        Ok(Self {
            group,
            members,
            released: false,
        })
    }

    /// The host group standing in for the whole unit
    pub fn shape(&self) -> ShapeId {
        self.group
    }

    /// Member shapes in grouping order
    pub fn members(&self) -> Vec<ShapeId> {
        self.members.iter().map(|m| m.shape).collect()
    }

    pub fn is_released(&self) -> bool {
        self.released
    }

    /// Current visual bounds of the unit
    pub fn bounds<H: CanvasHost + ?Sized>(&self, host: &H) -> Result<BoundingBox, LayoutError> {
        bounds_of(host, self.group)
    }

    /// Ungroup, restoring every member's container and relative order.
    ///
    /// Members that share the anchor's container are re-inserted right
    /// after the anchor; the default anchor is the group itself. Other
    /// members are appended to their original container. Members removed
    /// from the group since grouping are skipped. Calling this again
    /// after success does nothing.
    pub fn release<H: CanvasHost + ?Sized>(
        &mut self,
        host: &mut H,
        anchor: Option<ShapeId>,
    ) -> Result<(), LayoutError> {
        if self.released {
            return Ok(());
        }
        let live = host.children(Container::Group(self.group))?;
        let remaining: Vec<Member> = self
            .members
            .iter()
            .copied()
            .filter(|m| live.contains(&m.shape))
            .collect();

        let anchor = anchor.unwrap_or(self.group);
        let anchor_container = host.container_of(anchor)?;

        for member in remaining.iter().rev() {
            if member.origin == anchor_container {
                host.move_into_container(
                    member.shape,
                    anchor_container,
                    Some(anchor),
                    Placement::After,
                )?;
            }
        }
        for member in &remaining {
            if member.origin != anchor_container {
                host.move_into_container(member.shape, member.origin, None, Placement::Inside)?;
            }
        }

        host.remove_shape(self.group)?;
        self.released = true;
        Ok(())
    }

    fn release_after_failure<H: CanvasHost + ?Sized>(&mut self, host: &mut H) {
        if let Err(e) = self.release(host, None) {
            warn!(group = self.group.0, error = %e, "failed to release composite unit");
        }
    }
}

impl Drop for CompositeUnit {
    fn drop(&mut self) {
        if !self.released {
            warn!(
                group = self.group.0,
                members = self.members.len(),
                "composite unit dropped without being released"
            );
        }
    }
}

/// Run `f` with `members` grouped, releasing the group on every path.
///
/// When `f` fails its error is returned even if releasing also fails;
/// the release failure is logged.
pub fn with_composite<H, T, F>(
    host: &mut H,
    members: &[ShapeId],
    anchor: Option<ShapeId>,
    f: F,
) -> Result<T, LayoutError>
where
    H: CanvasHost + ?Sized,
    F: FnOnce(&mut H, &CompositeUnit) -> Result<T, LayoutError>,
{
    let mut unit = CompositeUnit::group(host, members, anchor)?;
    let result = f(host, &unit);
    let released = unit.release(host, None);

    match (result, released) {
        (Ok(value), Ok(())) => Ok(value),
        (Ok(_), Err(e)) => Err(e),
        (Err(e), Ok(())) => Err(e),
        (Err(e), Err(release_err)) => {
            warn!(group = unit.shape().0, error = %release_err, "failed to release composite unit");
            Err(e)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::MemoryHost;

    fn setup() -> (MemoryHost, Container, Vec<ShapeId>) {
        let mut host = MemoryHost::new();
        let canvas = host.add_canvas(BoundingBox::new(0.0, 0.0, 1000.0, 1000.0));
        let c = Container::Canvas(canvas.id);
        let shapes = (0..4)
            .map(|i| {
                let x = i as f64 * 20.0;
                host.add_path(c, &format!("s{}", i), BoundingBox::new(x, 0.0, x + 10.0, 10.0))
                    .unwrap()
            })
            .collect();
        (host, c, shapes)
    }

    #[test]
    fn test_group_and_release_restores_order() {
        let (mut host, c, s) = setup();
        let mut unit = CompositeUnit::group(&mut host, &[s[1], s[2]], Some(s[1])).unwrap();
        assert_eq!(host.children(c).unwrap(), vec![s[0], unit.shape(), s[3]]);
        assert_eq!(
            host.children(Container::Group(unit.shape())).unwrap(),
            vec![s[1], s[2]]
        );

        unit.release(&mut host, None).unwrap();
        assert!(unit.is_released());
        assert_eq!(host.children(c).unwrap(), s);
    }

    #[test]
    fn test_release_is_idempotent() {
        let (mut host, c, s) = setup();
        let mut unit = CompositeUnit::group(&mut host, &s, Some(s[0])).unwrap();
        unit.release(&mut host, None).unwrap();
        unit.release(&mut host, None).unwrap();
        assert_eq!(host.children(c).unwrap(), s);
    }

    #[test]
    fn test_release_after_explicit_anchor() {
        let (mut host, c, s) = setup();
        let mut unit = CompositeUnit::group(&mut host, &[s[0], s[1]], None).unwrap();
        unit.release(&mut host, Some(s[3])).unwrap();
        assert_eq!(host.children(c).unwrap(), vec![s[2], s[3], s[0], s[1]]);
    }

    #[test]
    fn test_members_from_other_containers_go_home() {
        let (mut host, c, s) = setup();
        let inner = host.add_group(c, "inner", false).unwrap();
        let nested = host
            .add_path(Container::Group(inner), "nested", BoundingBox::new(0.0, 50.0, 5.0, 55.0))
            .unwrap();

        let mut unit = CompositeUnit::group(&mut host, &[s[0], nested], Some(s[0])).unwrap();
        assert!(host.children(Container::Group(inner)).unwrap().is_empty());

        unit.release(&mut host, None).unwrap();
        assert_eq!(host.children(Container::Group(inner)).unwrap(), vec![nested]);
        assert_eq!(host.container_of(s[0]).unwrap(), c);
    }

    #[test]
    fn test_empty_members_rejected() {
        let (mut host, _, _) = setup();
        let err = CompositeUnit::group(&mut host, &[], None).unwrap_err();
        assert!(matches!(err, LayoutError::InvalidParameter { .. }));
    }

    #[test]
    fn test_adopt_releases_duplicate() {
        let (mut host, c, s) = setup();
        let mut unit = CompositeUnit::group(&mut host, &[s[0], s[1]], Some(s[0])).unwrap();
        let copy = host.duplicate_shape(unit.shape()).unwrap();

        let mut adopted = CompositeUnit::adopt(&host, copy).unwrap();
        assert_eq!(adopted.members().len(), 2);
        adopted.release(&mut host, None).unwrap();
        unit.release(&mut host, None).unwrap();

        let names: Vec<String> = host
            .children(c)
            .unwrap()
            .into_iter()
            .map(|id| host.name(id).unwrap())
            .collect();
        assert_eq!(names, vec!["s0", "s1", "s0", "s1", "s2", "s3"]);
    }

    #[test]
    fn test_with_composite_releases_on_error() {
        let (mut host, c, s) = setup();
        let result: Result<(), LayoutError> =
            with_composite(&mut host, &[s[1], s[2]], Some(s[1]), |_, _| {
                Err(LayoutError::capacity("forced"))
            });
        assert_eq!(result, Err(LayoutError::capacity("forced")));
        assert_eq!(host.children(c).unwrap(), s);
    }

    #[test]
    fn test_with_composite_moves_members_together() {
        let (mut host, _, s) = setup();
        with_composite(&mut host, &[s[0], s[1]], Some(s[0]), |host, unit| {
            host.translate(unit.shape(), 5.0, 5.0)
        })
        .unwrap();
        assert_eq!(host.bounding_box(s[0]).unwrap().left, 5.0);
        assert_eq!(host.bounding_box(s[1]).unwrap().left, 25.0);
        assert_eq!(host.bounding_box(s[2]).unwrap().left, 40.0);
    }
}
