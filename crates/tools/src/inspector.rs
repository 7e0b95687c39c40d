use roomscene_common::NodeId;
use roomscene_scene::SceneGraph;

/// Scene inspector for developer tooling.
///
/// Read-only queries against the scene graph for debugging and CLI output.
pub struct SceneInspector;

impl SceneInspector {
    /// Produce a summary of the scene.
    pub fn summary(scene: &SceneGraph) -> SceneSummary {
        let associations = scene.iter().map(|(_, node)| node.children().len()).sum();
        let roots = {
            let mut followed = vec![false; scene.len()];
            for (_, node) in scene.iter() {
                for child in node.children() {
                    if let Some(flag) = followed.get_mut(child.index()) {
                        *flag = true;
                    }
                }
            }
            followed.iter().filter(|f| !**f).count()
        };
        SceneSummary {
            node_count: scene.len(),
            association_count: associations,
            root_count: roots,
        }
    }

    /// Local transform and associations of one node.
    pub fn inspect_node(scene: &SceneGraph, id: NodeId) -> Option<NodeInfo> {
        scene.get(id).map(|node| {
            let t = node.transform();
            NodeInfo {
                id,
                name: node.name.clone(),
                position: t.position.to_array(),
                rotation: t.rotation.to_array(),
                scale: t.scale.to_array(),
                children: node.children().to_vec(),
            }
        })
    }

    /// Find a node by exact name.
    pub fn find(scene: &SceneGraph, name: &str) -> Option<NodeId> {
        scene
            .iter()
            .find(|(_, node)| node.name == name)
            .map(|(id, _)| id)
    }

    /// Indented outline of every composite, starting from nodes nobody follows.
    pub fn outline(scene: &SceneGraph) -> String {
        let mut followed = vec![false; scene.len()];
        for (_, node) in scene.iter() {
            for child in node.children() {
                if let Some(flag) = followed.get_mut(child.index()) {
                    *flag = true;
                }
            }
        }
        let mut out = String::new();
        for (id, _) in scene.iter().filter(|(id, _)| !followed[id.index()]) {
            outline_node(scene, id, 0, &mut out);
        }
        out
    }
}

fn outline_node(scene: &SceneGraph, id: NodeId, depth: usize, out: &mut String) {
    let Some(node) = scene.get(id) else {
        return;
    };
    let p = node.transform().position;
    out.push_str(&format!(
        "{:indent$}{} {} ({:.2}, {:.2}, {:.2})\n",
        "",
        id,
        node.name,
        p.x,
        p.y,
        p.z,
        indent = depth * 2
    ));
    for child in node.children() {
        outline_node(scene, *child, depth + 1, out);
    }
}

/// Summary of scene state for the inspector.
#[derive(Debug, Clone)]
pub struct SceneSummary {
    pub node_count: usize,
    pub association_count: usize,
    /// Nodes not associated under any other node.
    pub root_count: usize,
}

impl std::fmt::Display for SceneSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Scene: nodes={} associations={} roots={}",
            self.node_count, self.association_count, self.root_count
        )
    }
}

/// Detailed info about a single node.
#[derive(Debug, Clone)]
pub struct NodeInfo {
    pub id: NodeId,
    pub name: String,
    pub position: [f32; 3],
    pub rotation: [f32; 4],
    pub scale: [f32; 3],
    pub children: Vec<NodeId>,
}

impl std::fmt::Display for NodeInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Node {} {:?} pos=({:.2}, {:.2}, {:.2}) scale=({:.2}, {:.2}, {:.2}) children={}",
            self.id,
            self.name,
            self.position[0],
            self.position[1],
            self.position[2],
            self.scale[0],
            self.scale[1],
            self.scale[2],
            self.children.len(),
        )
    }
}
