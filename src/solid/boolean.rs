use super::bsp::BspNode;
use super::Solid;
use crate::error::Result;

/// Boolean operation type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BooleanOp {
    Union,
    Subtract,
    Intersect,
}

/// Executes a boolean operation on two closed solids.
///
/// Face materials survive the operation: faces contributed by `b` keep the
/// material they had in `b`.
///
/// # Errors
///
/// Returns [`crate::error::OperationError::SynthesisFailure`] if a BSP tree
/// cannot be built from the input faces.
pub fn boolean_execute(a: &Solid, b: &Solid, op: BooleanOp) -> Result<Solid> {
    if a.is_empty() {
        return Ok(match op {
            BooleanOp::Union => b.clone(),
            BooleanOp::Subtract | BooleanOp::Intersect => Solid::default(),
        });
    }
    if b.is_empty() {
        return Ok(match op {
            BooleanOp::Union | BooleanOp::Subtract => a.clone(),
            BooleanOp::Intersect => Solid::default(),
        });
    }

    let mut a = BspNode::from_faces(a.faces().to_vec())?;
    let mut b = BspNode::from_faces(b.faces().to_vec())?;

    match op {
        BooleanOp::Union => {
            a.clip_to(&b);
            b.clip_to(&a);
            b.invert();
            b.clip_to(&a);
            b.invert();
            a.build(b.all_faces())?;
        }
        BooleanOp::Subtract => {
            a.invert();
            a.clip_to(&b);
            b.clip_to(&a);
            b.invert();
            b.clip_to(&a);
            b.invert();
            a.build(b.all_faces())?;
            a.invert();
        }
        BooleanOp::Intersect => {
            a.invert();
            b.clip_to(&a);
            b.invert();
            a.clip_to(&b);
            b.clip_to(&a);
            a.build(b.all_faces())?;
            a.invert();
        }
    }

    Ok(Solid::from_faces(a.all_faces()))
}
