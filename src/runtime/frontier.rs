/// Frontier resolution: which jobs can be enqueued right now
///
/// The frontier is recomputed from scratch on every call. Readiness itself only
/// looks at direct parents, but before a job is admitted its whole ancestry is
/// swept with a depth counter. A sweep that goes deeper than the workflow's
/// depth limit means the graph loops back on itself, and the query fails with
/// `DependencyLevelTooDeep` instead of returning a partial frontier.

use crate::error::{GraphError, GraphResult};
use crate::workflow::{JobNode, Workflow};
use std::collections::{HashSet, VecDeque};

impl Workflow {
    /// Jobs eligible to run now, in declaration order
    ///
    /// Safe to call at any point: before anything started it returns the
    /// roots, after everything finished it returns nothing.
    pub fn next_jobs(&self) -> GraphResult<Vec<&JobNode>> {
        if !self.is_finalized() {
            tracing::warn!(
                "⚠️ Workflow '{}' queried with {} unresolved edges",
                self.id,
                self.pending_edges.len()
            );
        }

        let mut sweep = AncestrySweep::new(self);
        let mut ready = Vec::new();

        for node in &self.nodes {
            if node.is_terminal() || node.is_in_flight() {
                continue;
            }
            sweep.check(node)?;

            if node.is_ready(|name| self.find_job(name).ok()) {
                ready.push(node);
            }
        }

        tracing::debug!(
            "🎯 Workflow '{}' frontier: {:?}",
            self.id,
            ready.iter().map(|n| n.name()).collect::<Vec<_>>()
        );

        Ok(ready)
    }

    /// All transitive upstream jobs of `name`, nearest first, without duplicates
    pub fn dependencies(&self, name: &str) -> GraphResult<Vec<&JobNode>> {
        let start = self.find_job(name)?;
        AncestrySweep::new(self).check(start)?;

        let mut seen: HashSet<&str> = HashSet::new();
        let mut queue: VecDeque<&JobNode> = VecDeque::from([start]);
        let mut upstream = Vec::new();

        while let Some(node) = queue.pop_front() {
            for parent in &node.incoming {
                if seen.insert(parent.as_str()) {
                    let parent = self.find_job(parent)?;
                    upstream.push(parent);
                    queue.push_back(parent);
                }
            }
        }

        Ok(upstream)
    }

    /// Depth bound for ancestry sweeps on this workflow
    pub fn depth_limit(&self) -> usize {
        self.graph_config.depth_limit(self.nodes.len())
    }
}

/// Bounded walk over `incoming` edges
///
/// Nodes whose ancestry was already walked to the roots are remembered for the
/// rest of the query, so a whole frontier computation touches each edge once.
/// Nodes on a cycle are never cleared, so a loop keeps deepening the path
/// until it trips the limit.
struct AncestrySweep<'a> {
    workflow: &'a Workflow,
    limit: usize,
    cleared: HashSet<&'a str>,
}

impl<'a> AncestrySweep<'a> {
    fn new(workflow: &'a Workflow) -> Self {
        Self {
            workflow,
            limit: workflow.depth_limit(),
            cleared: HashSet::new(),
        }
    }

    fn check(&mut self, start: &'a JobNode) -> GraphResult<()> {
        // Each frame is a node on the current path plus the next parent to visit
        let mut path: Vec<(&'a JobNode, usize)> = vec![(start, 0)];

        while let Some(frame) = path.last_mut() {
            let (node, next_parent) = *frame;

            if self.cleared.contains(node.name()) {
                path.pop();
                continue;
            }

            match node.incoming.get(next_parent) {
                Some(parent) => {
                    frame.1 += 1;
                    let parent = self.workflow.find_job(parent)?;
                    if path.len() > self.limit {
                        tracing::error!(
                            "❌ Dependency walk from '{}' exceeded depth {}",
                            start.name(),
                            self.limit
                        );
                        return Err(GraphError::too_deep(start.name(), self.limit));
                    }
                    path.push((parent, 0));
                }
                None => {
                    self.cleared.insert(node.name());
                    path.pop();
                }
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::config::GraphConfig;
    use crate::error::GraphError;
    use crate::workflow::{RunOptions, Workflow};

    fn names(flow: &Workflow) -> Vec<String> {
        flow.next_jobs()
            .unwrap()
            .into_iter()
            .map(|n| n.name().to_string())
            .collect()
    }

    fn chain(len: usize) -> Workflow {
        let mut flow = Workflow::new("chain").with_graph_config(GraphConfig { depth_factor: 1 });
        for i in 0..len {
            flow.run(format!("job-{i}"), RunOptions::new()).unwrap();
        }
        flow.create_dependencies().unwrap();
        flow
    }

    #[test]
    fn long_acyclic_chain_stays_within_limit() {
        let mut flow = chain(500);
        assert_eq!(names(&flow), ["job-0"]);

        for i in 0..499 {
            flow.mark_finished(&format!("job-{i}")).unwrap();
        }
        assert_eq!(names(&flow), ["job-499"]);
    }

    #[test]
    fn self_loop_is_too_deep() {
        let mut flow = Workflow::new("loop");
        flow.run("A", RunOptions::new().after("A")).unwrap();
        flow.create_dependencies().unwrap();

        assert!(matches!(
            flow.next_jobs(),
            Err(GraphError::DependencyLevelTooDeep { limit: 1, .. })
        ));
    }

    #[test]
    fn cycle_behind_a_finished_job_is_still_detected() {
        let mut flow = Workflow::new("hidden-loop");
        flow.run("Root", RunOptions::new()).unwrap();
        flow.run("X", RunOptions::new().after("Root").after("Y")).unwrap();
        flow.run("Y", RunOptions::new().after("X")).unwrap();
        flow.create_dependencies().unwrap();
        flow.mark_finished("Root").unwrap();

        assert!(matches!(
            flow.next_jobs(),
            Err(GraphError::DependencyLevelTooDeep { .. })
        ));
    }

    #[test]
    fn in_flight_jobs_are_skipped() {
        let mut flow = chain(2);
        flow.mark_enqueued("job-0").unwrap();
        assert!(names(&flow).is_empty());

        flow.mark_running("job-0").unwrap();
        assert!(names(&flow).is_empty());
    }

    #[test]
    fn dependencies_are_transitive_and_deduplicated() {
        let mut flow = Workflow::new("deps");
        flow.run("Prepare", RunOptions::new()).unwrap();
        flow.run("Left", RunOptions::new().after("Prepare")).unwrap();
        flow.run("Right", RunOptions::new().after("Prepare")).unwrap();
        flow.run("Join", RunOptions::new().after("Left").after("Right")).unwrap();
        flow.create_dependencies().unwrap();

        let deps: Vec<&str> = flow
            .dependencies("Join")
            .unwrap()
            .into_iter()
            .map(|n| n.name())
            .collect();
        assert_eq!(deps, ["Left", "Right", "Prepare"]);
        assert!(flow.dependencies("Prepare").unwrap().is_empty());
    }

    #[test]
    fn dependencies_of_unknown_job_is_not_found() {
        let flow = chain(1);
        assert!(matches!(
            flow.dependencies("ghost"),
            Err(GraphError::NotFound { .. })
        ));
    }

    #[test]
    fn larger_factor_raises_the_limit() {
        let flow = chain(4).with_graph_config(GraphConfig { depth_factor: 3 });
        assert_eq!(flow.depth_limit(), 12);
    }
}
