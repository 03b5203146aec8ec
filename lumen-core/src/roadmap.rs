#[derive(Debug)]
pub struct RoadmapNode {
    pub id: &'static str,
    pub title: &'static str,
    pub description: &'static str,
}

#[derive(Debug)]
pub struct RoadmapLevel {
    pub id: &'static str,
    pub title: &'static str,
    pub nodes: &'static [RoadmapNode],
}

static ROADMAP: &[RoadmapLevel] = &[
    RoadmapLevel {
        id: "beginner",
        title: "Beginner ML",
        nodes: &[
            RoadmapNode {
                id: "intro",
                title: "What is AI?",
                description: "Start your journey here.",
            },
            RoadmapNode {
                id: "linear_regression",
                title: "Linear Regression",
                description: "Predicting numbers with lines.",
            },
            RoadmapNode {
                id: "logistic_regression",
                title: "Logistic Regression",
                description: "Classifying things.",
            },
            RoadmapNode {
                id: "gradient_descent",
                title: "Gradient Descent",
                description: "Ideally walking down a hill.",
            },
        ],
    },
    RoadmapLevel {
        id: "intermediate",
        title: "Intermediate ML",
        nodes: &[
            RoadmapNode {
                id: "decision_trees",
                title: "Decision Trees",
                description: "Making choices.",
            },
            RoadmapNode {
                id: "random_forest",
                title: "Ensemble Methods",
                description: "Strength in numbers.",
            },
            RoadmapNode {
                id: "svm",
                title: "Support Vector Machines",
                description: "Drawing better lines.",
            },
        ],
    },
    RoadmapLevel {
        id: "advanced",
        title: "Deep Learning",
        nodes: &[
            RoadmapNode {
                id: "neural_networks",
                title: "Neural Networks",
                description: "Brain-inspired computing.",
            },
            RoadmapNode {
                id: "cnns",
                title: "CNNs",
                description: "Computer Vision.",
            },
            RoadmapNode {
                id: "rnns",
                title: "RNNs / LSTMs",
                description: "Sequence data.",
            },
        ],
    },
    RoadmapLevel {
        id: "expert",
        title: "ML Engineer",
        nodes: &[
            RoadmapNode {
                id: "transformers",
                title: "Transformers",
                description: "Current SOTA.",
            },
            RoadmapNode {
                id: "deployment",
                title: "Deployment",
                description: "Shipping models.",
            },
            RoadmapNode {
                id: "evaluation",
                title: "Model Evaluation",
                description: "Is it good?",
            },
        ],
    },
];

/// The full static curriculum, in display order.
pub fn levels() -> &'static [RoadmapLevel] {
    ROADMAP
}

pub fn find_node(node_id: &str) -> Option<&'static RoadmapNode> {
    ROADMAP
        .iter()
        .flat_map(|level| level.nodes.iter())
        .find(|node| node.id == node_id)
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::{find_node, levels};

    #[test]
    fn catalog_has_four_levels_and_thirteen_nodes() {
        let ids: Vec<&str> = levels().iter().map(|level| level.id).collect();
        assert_eq!(ids, ["beginner", "intermediate", "advanced", "expert"]);

        let nodes: usize = levels().iter().map(|level| level.nodes.len()).sum();
        assert_eq!(nodes, 13);
    }

    #[test]
    fn node_ids_are_unique() {
        let mut seen = HashSet::new();
        for node in levels().iter().flat_map(|level| level.nodes.iter()) {
            assert!(seen.insert(node.id), "duplicate node id {}", node.id);
        }
    }

    #[test]
    fn finds_nodes_by_id() {
        assert_eq!(find_node("rnns").map(|node| node.title), Some("RNNs / LSTMs"));
        assert!(find_node("quantum").is_none());
    }
}
