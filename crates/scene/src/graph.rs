use glam::{Mat4, Quat, Vec3};
use roomscene_common::sanitize::{finite_or, finite_scale, finite_vec3};
use roomscene_common::{NodeId, Transform};
use serde::{Deserialize, Serialize};

/// Errors from scene graph operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SceneError {
    #[error("node {0} does not exist in this scene")]
    UnknownNode(NodeId),
    #[error("associating {child} under {parent} would create a cycle")]
    CycleDetected { parent: NodeId, child: NodeId },
}

/// A scene object's local transform plus the nodes that follow it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransformNode {
    pub name: String,
    transform: Transform,
    /// Associated nodes, in association order. Not owned.
    children: Vec<NodeId>,
}

impl TransformNode {
    pub fn transform(&self) -> &Transform {
        &self.transform
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// Render-ready world matrix. Nodes sit directly under the scene root,
    /// so the world transform is the local one.
    pub fn world_matrix(&self) -> Mat4 {
        self.transform.matrix()
    }
}

/// Arena of transform nodes.
///
/// Composition is static after scene construction: there is no removal, and
/// ids stay valid for the lifetime of the graph.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SceneGraph {
    nodes: Vec<TransformNode>,
}

impl SceneGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of nodes in the scene.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Create a node with the given initial transform. Returns its id.
    pub fn spawn(&mut self, name: impl Into<String>, transform: Transform) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        let name = name.into();
        tracing::trace!(%id, %name, "spawned node");
        self.nodes.push(TransformNode {
            name,
            transform,
            children: Vec::new(),
        });
        id
    }

    pub fn get(&self, id: NodeId) -> Option<&TransformNode> {
        self.nodes.get(id.index())
    }

    /// Iterate over all nodes in id order.
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &TransformNode)> {
        self.nodes
            .iter()
            .enumerate()
            .map(|(i, node)| (NodeId(i as u32), node))
    }

    pub fn transform(&self, id: NodeId) -> Result<&Transform, SceneError> {
        self.node(id).map(|n| &n.transform)
    }

    pub fn world_matrix(&self, id: NodeId) -> Result<Mat4, SceneError> {
        self.node(id).map(TransformNode::world_matrix)
    }

    pub fn children(&self, id: NodeId) -> Result<&[NodeId], SceneError> {
        self.node(id).map(|n| n.children.as_slice())
    }

    /// Register `child` to receive every future operation applied to `parent`.
    ///
    /// The child's current transform is left untouched. A node may follow
    /// several parents. Re-associating an existing pair is a no-op.
    pub fn associate(&mut self, parent: NodeId, child: NodeId) -> Result<(), SceneError> {
        self.node(parent)?;
        self.node(child)?;
        if parent == child || self.subtree(child).contains(&parent) {
            return Err(SceneError::CycleDetected { parent, child });
        }
        let children = &mut self.nodes[parent.index()].children;
        if !children.contains(&child) {
            children.push(child);
            tracing::debug!(%parent, %child, "associated node");
        }
        Ok(())
    }

    /// `root` followed by every node reachable through associations, each
    /// listed once, in pre-order.
    pub fn subtree(&self, root: NodeId) -> Vec<NodeId> {
        let mut visited = vec![false; self.nodes.len()];
        let mut order = Vec::new();
        let mut stack = vec![root];
        while let Some(id) = stack.pop() {
            let Some(node) = self.nodes.get(id.index()) else {
                continue;
            };
            if std::mem::replace(&mut visited[id.index()], true) {
                continue;
            }
            order.push(id);
            // Reverse so the first associated child is visited first.
            stack.extend(node.children.iter().rev().copied());
        }
        order
    }

    /// Add a translation to `id` and every associated descendant.
    ///
    /// The offset is expressed in the parent (world) frame, so a composite
    /// moves rigidly regardless of each part's own orientation.
    pub fn translate(&mut self, id: NodeId, delta: Vec3) -> Result<(), SceneError> {
        self.node(id)?;
        let delta = finite_vec3(delta);
        for target in self.subtree(id) {
            self.nodes[target.index()].transform.position += delta;
        }
        Ok(())
    }

    /// Compose a rotation of `angle` radians about `axis` into the local
    /// orientation of `id` and every associated descendant.
    ///
    /// Each node turns about its own origin. Calls accumulate in call order.
    /// A degenerate axis or non-finite angle leaves the scene unchanged.
    pub fn rotate(&mut self, id: NodeId, axis: Vec3, angle: f32) -> Result<(), SceneError> {
        self.node(id)?;
        let axis = finite_vec3(axis);
        if axis.length_squared() <= f32::EPSILON || !angle.is_finite() {
            tracing::trace!(%id, "ignored degenerate rotation");
            return Ok(());
        }
        let delta = Quat::from_axis_angle(axis.normalize(), angle);
        for target in self.subtree(id) {
            let transform = &mut self.nodes[target.index()].transform;
            transform.rotation = (transform.rotation * delta).normalize();
        }
        Ok(())
    }

    /// Multiply the scale of `id` and every associated descendant by `factor`.
    ///
    /// Descendants compound the factor with their own prior scale: a child
    /// already at 3 under a parent scaled by 2 ends at 6. Repeated calls
    /// compound without bound.
    pub fn scale(&mut self, id: NodeId, factor: Vec3) -> Result<(), SceneError> {
        self.node(id)?;
        let factor = finite_scale(factor);
        for target in self.subtree(id) {
            self.nodes[target.index()].transform.scale *= factor;
        }
        Ok(())
    }

    /// Uniform variant of [`SceneGraph::scale`].
    pub fn scale_uniform(&mut self, id: NodeId, factor: f32) -> Result<(), SceneError> {
        self.scale(id, Vec3::splat(finite_or(factor, 1.0)))
    }

    fn node(&self, id: NodeId) -> Result<&TransformNode, SceneError> {
        self.nodes.get(id.index()).ok_or(SceneError::UnknownNode(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    fn at(x: f32, y: f32, z: f32) -> Transform {
        Transform::from_position(Vec3::new(x, y, z))
    }

    fn approx(a: Vec3, b: Vec3) -> bool {
        (a - b).length() < 1e-5
    }

    #[test]
    fn spawn_assigns_sequential_ids() {
        let mut scene = SceneGraph::new();
        let a = scene.spawn("a", Transform::default());
        let b = scene.spawn("b", Transform::default());
        assert_eq!(a, NodeId(0));
        assert_eq!(b, NodeId(1));
        assert_eq!(scene.len(), 2);
        assert_eq!(scene.get(b).unwrap().name, "b");
    }

    #[test]
    fn associate_does_not_move_child() {
        let mut scene = SceneGraph::new();
        let parent = scene.spawn("table", at(5.0, 0.0, 0.0));
        let child = scene.spawn("plate", at(0.0, 3.0, 0.0));
        scene.associate(parent, child).unwrap();
        assert_eq!(scene.transform(child).unwrap().position, Vec3::new(0.0, 3.0, 0.0));
        assert_eq!(scene.children(parent).unwrap(), &[child]);
    }

    #[test]
    fn translate_moves_parent_and_both_children() {
        let mut scene = SceneGraph::new();
        let parent = scene.spawn("table", at(0.0, 0.0, 0.0));
        let a = scene.spawn("cake", at(1.0, 2.0, 3.0));
        let b = scene.spawn("plate", at(-4.0, 0.5, 2.0));
        scene.associate(parent, a).unwrap();
        scene.associate(parent, b).unwrap();
        scene.rotate(b, Vec3::Y, FRAC_PI_2).unwrap();

        let before_a = scene.world_matrix(a).unwrap().w_axis.truncate();
        let before_b = scene.world_matrix(b).unwrap().w_axis.truncate();
        scene.translate(parent, Vec3::X).unwrap();

        let after_a = scene.world_matrix(a).unwrap().w_axis.truncate();
        let after_b = scene.world_matrix(b).unwrap().w_axis.truncate();
        assert_eq!(after_a - before_a, Vec3::X);
        assert_eq!(after_b - before_b, Vec3::X);
        assert_eq!(scene.transform(parent).unwrap().position, Vec3::X);
    }

    #[test]
    fn propagation_is_recursive() {
        let mut scene = SceneGraph::new();
        let cake = scene.spawn("cake", Transform::default());
        let candle = scene.spawn("candle", Transform::default());
        let flame = scene.spawn("flame", at(0.0, 0.1, 0.0));
        scene.associate(cake, candle).unwrap();
        scene.associate(candle, flame).unwrap();

        scene.translate(cake, Vec3::new(0.0, 3.0, 0.0)).unwrap();
        assert_eq!(scene.transform(flame).unwrap().position, Vec3::new(0.0, 3.1, 0.0));

        // Moving the candle alone leaves the cake where it is.
        scene.translate(candle, Vec3::new(0.25, 0.0, -0.25)).unwrap();
        assert_eq!(scene.transform(cake).unwrap().position, Vec3::new(0.0, 3.0, 0.0));
        assert!(approx(
            scene.transform(flame).unwrap().position,
            Vec3::new(0.25, 3.1, -0.25)
        ));
    }

    #[test]
    fn scale_compounds_with_child_scale() {
        let mut scene = SceneGraph::new();
        let frame = scene.spawn("frame", Transform::default());
        let beetle = scene.spawn("beetle", Transform::default());
        scene.scale(beetle, Vec3::new(3.0, 1.0, 1.0)).unwrap();
        scene.associate(frame, beetle).unwrap();

        scene.scale(frame, Vec3::new(2.0, 1.0, 1.0)).unwrap();
        assert_eq!(scene.transform(frame).unwrap().scale.x, 2.0);
        assert_eq!(scene.transform(beetle).unwrap().scale.x, 6.0);

        let world = scene.world_matrix(beetle).unwrap();
        assert_eq!(world.transform_vector3(Vec3::X).x, 6.0);
    }

    #[test]
    fn repeated_scale_keeps_compounding() {
        let mut scene = SceneGraph::new();
        let node = scene.spawn("node", Transform::default());
        scene.scale_uniform(node, 2.0).unwrap();
        scene.scale_uniform(node, 2.0).unwrap();
        assert_eq!(scene.transform(node).unwrap().scale, Vec3::splat(4.0));
    }

    #[test]
    fn rotation_turns_children_about_their_own_origin() {
        let mut scene = SceneGraph::new();
        let table = scene.spawn("table", Transform::default());
        let jar = scene.spawn("jar", at(1.2, 3.1, 1.2));
        scene.associate(table, jar).unwrap();

        scene.rotate(table, Vec3::Y, -FRAC_PI_2).unwrap();
        let jar_t = scene.transform(jar).unwrap();
        assert_eq!(jar_t.position, Vec3::new(1.2, 3.1, 1.2));
        assert!(approx(jar_t.rotation * Vec3::X, Vec3::Z));
    }

    #[test]
    fn rotations_accumulate_in_call_order() {
        let mut scene = SceneGraph::new();
        let a = scene.spawn("a", Transform::default());
        let b = scene.spawn("b", Transform::default());
        scene.rotate(a, Vec3::Y, FRAC_PI_2).unwrap();
        scene.rotate(a, Vec3::X, FRAC_PI_2).unwrap();
        scene.rotate(b, Vec3::X, FRAC_PI_2).unwrap();
        scene.rotate(b, Vec3::Y, FRAC_PI_2).unwrap();

        let ra = scene.transform(a).unwrap().rotation;
        let rb = scene.transform(b).unwrap().rotation;
        // yaw then local pitch: +Z ends up pointing down
        assert!(approx(ra * Vec3::Z, -Vec3::Y));
        // pitch then local yaw: +Z ends up along +X
        assert!(approx(rb * Vec3::Z, Vec3::X));
    }

    #[test]
    fn cycles_are_rejected() {
        let mut scene = SceneGraph::new();
        let a = scene.spawn("a", Transform::default());
        let b = scene.spawn("b", Transform::default());
        let c = scene.spawn("c", Transform::default());
        scene.associate(a, b).unwrap();
        scene.associate(b, c).unwrap();

        assert_eq!(
            scene.associate(c, a),
            Err(SceneError::CycleDetected { parent: c, child: a })
        );
        assert_eq!(
            scene.associate(a, a),
            Err(SceneError::CycleDetected { parent: a, child: a })
        );
    }

    #[test]
    fn shared_child_moves_once() {
        let mut scene = SceneGraph::new();
        let root = scene.spawn("root", Transform::default());
        let left = scene.spawn("left", Transform::default());
        let right = scene.spawn("right", Transform::default());
        let shared = scene.spawn("shared", Transform::default());
        scene.associate(root, left).unwrap();
        scene.associate(root, right).unwrap();
        scene.associate(left, shared).unwrap();
        scene.associate(right, shared).unwrap();

        scene.translate(root, Vec3::Y).unwrap();
        assert_eq!(scene.transform(shared).unwrap().position, Vec3::Y);
        assert_eq!(scene.subtree(root).len(), 4);
    }

    #[test]
    fn duplicate_association_is_ignored() {
        let mut scene = SceneGraph::new();
        let a = scene.spawn("a", Transform::default());
        let b = scene.spawn("b", Transform::default());
        scene.associate(a, b).unwrap();
        scene.associate(a, b).unwrap();
        assert_eq!(scene.children(a).unwrap().len(), 1);
    }

    #[test]
    fn unknown_node_is_an_error() {
        let mut scene = SceneGraph::new();
        let ghost = NodeId(42);
        assert_eq!(scene.translate(ghost, Vec3::X), Err(SceneError::UnknownNode(ghost)));
        let a = scene.spawn("a", Transform::default());
        assert_eq!(scene.associate(a, ghost), Err(SceneError::UnknownNode(ghost)));
    }

    #[test]
    fn non_finite_input_is_clamped() {
        let mut scene = SceneGraph::new();
        let a = scene.spawn("a", at(1.0, 1.0, 1.0));
        scene.translate(a, Vec3::new(f32::NAN, 1.0, f32::INFINITY)).unwrap();
        assert_eq!(scene.transform(a).unwrap().position, Vec3::new(1.0, 2.0, 1.0));

        scene.rotate(a, Vec3::Y, f32::NAN).unwrap();
        scene.rotate(a, Vec3::ZERO, 1.0).unwrap();
        assert_eq!(scene.transform(a).unwrap().rotation, Quat::IDENTITY);

        scene.scale(a, Vec3::new(2.0, f32::NAN, 1.0)).unwrap();
        assert_eq!(scene.transform(a).unwrap().scale, Vec3::new(2.0, 1.0, 1.0));
    }
}
