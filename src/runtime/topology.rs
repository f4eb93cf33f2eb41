/// Petgraph view of a finalized workflow
///
/// The frontier resolver works on the workflow's own adjacency lists. This
/// module is for callers that want a whole-graph view: a deterministic
/// topological order, or cycle validation before the workflow is persisted.

use crate::error::{GraphError, GraphResult};
use crate::workflow::Workflow;
use petgraph::algo::{is_cyclic_directed, toposort};
use petgraph::graph::{DiGraph, NodeIndex};
use std::collections::HashMap;

/// A workflow's job graph as a petgraph DiGraph
#[derive(Debug)]
pub struct WorkflowTopology {
    /// Node weights are job names, edges point downstream
    graph: DiGraph<String, ()>,
    /// Mapping from job name to graph node index
    name_to_index: HashMap<String, NodeIndex>,
}

impl WorkflowTopology {
    /// Build the DiGraph from the workflow's resolved edges
    pub fn build(workflow: &Workflow) -> GraphResult<Self> {
        tracing::debug!(
            "🏗️ Building topology for '{}' with {} jobs",
            workflow.id(),
            workflow.total()
        );

        let mut graph = DiGraph::new();
        let mut name_to_index = HashMap::new();

        for node in workflow.nodes() {
            let index = graph.add_node(node.name().to_string());
            name_to_index.insert(node.name().to_string(), index);
        }

        for node in workflow.nodes() {
            let to_index = name_to_index[node.name()];
            for upstream in node.incoming() {
                let from_index = name_to_index
                    .get(upstream)
                    .ok_or_else(|| GraphError::not_found(upstream.as_str()))?;
                graph.add_edge(*from_index, to_index, ());
            }
        }

        Ok(Self {
            graph,
            name_to_index,
        })
    }

    pub fn is_acyclic(&self) -> bool {
        !is_cyclic_directed(&self.graph)
    }

    /// Job names in an order where every job comes after its dependencies
    pub fn topological_order(&self) -> GraphResult<Vec<String>> {
        let order = toposort(&self.graph, None).map_err(|cycle| {
            let job = self.graph[cycle.node_id()].clone();
            tracing::error!("❌ Workflow graph has a cycle through '{}'", job);
            GraphError::CycleDetected { job }
        })?;

        Ok(order.into_iter().map(|idx| self.graph[idx].clone()).collect())
    }

    /// Number of edges in the graph
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.name_to_index.contains_key(name)
    }
}

impl Workflow {
    pub fn topology(&self) -> GraphResult<WorkflowTopology> {
        WorkflowTopology::build(self)
    }
}

#[cfg(test)]
mod tests {
    use crate::error::GraphError;
    use crate::workflow::{RunOptions, Workflow};

    #[test]
    fn orders_jobs_after_their_dependencies() {
        let mut flow = Workflow::new("topo");
        flow.run("Normalize", RunOptions::new().after("Fetch")).unwrap();
        flow.run("Fetch", RunOptions::new().after("Prepare")).unwrap();
        flow.run("Prepare", RunOptions::new().before("Fetch")).unwrap();
        flow.create_dependencies().unwrap();

        let topology = flow.topology().unwrap();
        assert!(topology.is_acyclic());
        assert_eq!(topology.edge_count(), 2);
        assert!(topology.contains("Prepare"));
        assert_eq!(
            topology.topological_order().unwrap(),
            ["Prepare", "Fetch", "Normalize"]
        );
    }

    #[test]
    fn cycles_are_reported() {
        let mut flow = Workflow::new("topo");
        flow.run("X", RunOptions::new().after("Z")).unwrap();
        flow.run("Y", RunOptions::new().after("X")).unwrap();
        flow.run("Z", RunOptions::new().after("Y")).unwrap();
        flow.create_dependencies().unwrap();

        let topology = flow.topology().unwrap();
        assert!(!topology.is_acyclic());
        assert!(matches!(
            topology.topological_order(),
            Err(GraphError::CycleDetected { .. })
        ));
    }
}
