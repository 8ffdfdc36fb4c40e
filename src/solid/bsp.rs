use super::{Face, Plane};
use crate::error::{OperationError, Result};

/// Nesting limit for [`BspNode::build`]. Near-degenerate input can otherwise
/// recurse without bound.
const MAX_DEPTH: usize = 1024;

/// Binary space partitioning tree over faces.
///
/// Each node keeps the faces coplanar with its splitting plane; faces in
/// front and behind live in the child subtrees.
#[derive(Debug, Default)]
pub(crate) struct BspNode {
    plane: Option<Plane>,
    faces: Vec<Face>,
    front: Option<Box<BspNode>>,
    back: Option<Box<BspNode>>,
}

impl BspNode {
    /// Builds a tree from the faces of a solid.
    pub(crate) fn from_faces(faces: Vec<Face>) -> Result<Self> {
        let mut node = Self::default();
        node.build(faces)?;
        Ok(node)
    }

    /// Converts solid space to empty space and vice versa.
    pub(crate) fn invert(&mut self) {
        for face in &mut self.faces {
            face.flip();
        }
        if let Some(plane) = &mut self.plane {
            plane.flip();
        }
        if let Some(front) = &mut self.front {
            front.invert();
        }
        if let Some(back) = &mut self.back {
            back.invert();
        }
        std::mem::swap(&mut self.front, &mut self.back);
    }

    /// Removes the parts of `faces` that lie inside this tree.
    pub(crate) fn clip_faces(&self, faces: Vec<Face>) -> Vec<Face> {
        let Some(plane) = self.plane else {
            return faces;
        };
        let mut front = Vec::new();
        let mut back = Vec::new();
        for face in faces {
            let mut coplanar_front = Vec::new();
            let mut coplanar_back = Vec::new();
            plane.split_face(face, &mut coplanar_front, &mut coplanar_back, &mut front, &mut back);
            front.append(&mut coplanar_front);
            back.append(&mut coplanar_back);
        }
        let mut front = match &self.front {
            Some(node) => node.clip_faces(front),
            None => front,
        };
        let back = match &self.back {
            Some(node) => node.clip_faces(back),
            None => Vec::new(),
        };
        front.extend(back);
        front
    }

    /// Removes the parts of this tree's faces that lie inside `other`.
    pub(crate) fn clip_to(&mut self, other: &BspNode) {
        let faces = std::mem::take(&mut self.faces);
        self.faces = other.clip_faces(faces);
        if let Some(front) = &mut self.front {
            front.clip_to(other);
        }
        if let Some(back) = &mut self.back {
            back.clip_to(other);
        }
    }

    /// Collects every face in the tree.
    pub(crate) fn all_faces(&self) -> Vec<Face> {
        let mut out = Vec::new();
        self.collect_faces(&mut out);
        out
    }

    fn collect_faces(&self, out: &mut Vec<Face>) {
        out.extend(self.faces.iter().cloned());
        if let Some(front) = &self.front {
            front.collect_faces(out);
        }
        if let Some(back) = &self.back {
            back.collect_faces(out);
        }
    }

    /// Inserts faces into the tree.
    ///
    /// # Errors
    ///
    /// Returns [`OperationError::SynthesisFailure`] if the tree grows deeper
    /// than the nesting limit.
    pub(crate) fn build(&mut self, faces: Vec<Face>) -> Result<()> {
        self.build_at(faces, 0)
    }

    fn build_at(&mut self, faces: Vec<Face>, depth: usize) -> Result<()> {
        if faces.is_empty() {
            return Ok(());
        }
        if depth > MAX_DEPTH {
            return Err(OperationError::SynthesisFailure(
                "BSP tree exceeded its nesting limit".into(),
            )
            .into());
        }
        let plane = *self.plane.get_or_insert(faces[0].plane);

        let mut front = Vec::new();
        let mut back = Vec::new();
        for face in faces {
            let mut coplanar_front = Vec::new();
            let mut coplanar_back = Vec::new();
            plane.split_face(face, &mut coplanar_front, &mut coplanar_back, &mut front, &mut back);
            self.faces.append(&mut coplanar_front);
            self.faces.append(&mut coplanar_back);
        }
        if !front.is_empty() {
            self.front
                .get_or_insert_with(Box::default)
                .build_at(front, depth + 1)?;
        }
        if !back.is_empty() {
            self.back
                .get_or_insert_with(Box::default)
                .build_at(back, depth + 1)?;
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::math::Point2;
    use crate::solid::{Extrude, Solid};

    fn cube_faces(min: f64, max: f64) -> Vec<Face> {
        Extrude::new(
            vec![
                Point2::new(min, min),
                Point2::new(max, min),
                Point2::new(max, max),
                Point2::new(min, max),
            ],
            min,
            max,
        )
        .execute()
        .unwrap()
        .into_faces()
    }

    #[test]
    fn tree_keeps_every_face() {
        let node = BspNode::from_faces(cube_faces(0.0, 1.0)).unwrap();
        assert_eq!(node.all_faces().len(), 6);
    }

    #[test]
    fn faces_inside_are_clipped_away() {
        let node = BspNode::from_faces(cube_faces(-2.0, 2.0)).unwrap();
        let inner = cube_faces(-1.0, 1.0);
        assert!(node.clip_faces(inner).is_empty());
    }

    #[test]
    fn faces_outside_survive_clipping() {
        let node = BspNode::from_faces(cube_faces(-1.0, 1.0)).unwrap();
        let outer = cube_faces(3.0, 4.0);
        assert_eq!(node.clip_faces(outer).len(), 6);
    }

    #[test]
    fn invert_turns_solid_inside_out() {
        let mut node = BspNode::from_faces(cube_faces(0.0, 1.0)).unwrap();
        node.invert();
        let inverted = Solid::from_faces(node.all_faces());
        assert!((inverted.volume() + 1.0).abs() < 1e-9);
        node.invert();
        let restored = Solid::from_faces(node.all_faces());
        assert!((restored.volume() - 1.0).abs() < 1e-9);
    }
}
