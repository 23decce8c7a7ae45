//! Rendering of a [`Plan`] for stdout.
//!
//! Every renderer walks the plan's graphs, which are already restricted to
//! the selection, in sorted order, so output is deterministic.
//!
//! | Format            | Graph        | Shape                            |
//! |-------------------|--------------|----------------------------------|
//! | `Schedule`        | schedule     | `component: dep, dep`            |
//! | `Dependencies`    | dependencies | `component: dep, dep`            |
//! | `Full`            | dependencies | `component: dep, !strong`        |
//! | `DotDependencies` | dependencies | `digraph dependencies`           |
//! | `DotSchedule`     | schedule     | `digraph schedule`, edges flipped |
//! | `GithubMatrix`    | selection    | JSON array                       |

use std::io::{self, Write};

use monobuild_core::{Graph, Kind, Plan};

use crate::cmd::OutputArgs;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Schedule,
    Dependencies,
    Full,
    DotDependencies,
    DotSchedule,
    GithubMatrix,
}

impl Format {
    /// Pick a format from command-line flags. `--dot` wins over everything,
    /// then `--github-matrix`, then `--full`, then `--dependencies`.
    #[must_use]
    pub const fn from_flags(args: &OutputArgs, github_matrix: bool) -> Self {
        if args.dot {
            if args.dependencies {
                Self::DotDependencies
            } else {
                Self::DotSchedule
            }
        } else if github_matrix {
            Self::GithubMatrix
        } else if args.full {
            Self::Full
        } else if args.dependencies {
            Self::Dependencies
        } else {
            Self::Schedule
        }
    }
}

/// Write `plan` to `w` in `format`.
///
/// # Errors
///
/// Propagates write failures from `w`.
pub fn render(plan: &Plan, format: Format, w: &mut dyn Write) -> io::Result<()> {
    match format {
        Format::Schedule => text(&plan.schedule, false, w),
        Format::Dependencies => text(&plan.dependencies, false, w),
        Format::Full => text(&plan.dependencies, true, w),
        Format::DotDependencies => dot_dependencies(&plan.dependencies, w),
        Format::DotSchedule => dot_schedule(&plan.schedule, w),
        Format::GithubMatrix => github_matrix(&plan.selection, w),
    }
}

fn text(graph: &Graph, mark_strong: bool, w: &mut dyn Write) -> io::Result<()> {
    for vertex in graph.vertices() {
        let deps: Vec<String> = graph
            .edges(&vertex)
            .into_iter()
            .map(|edge| match edge.kind {
                Kind::Strong if mark_strong => format!("!{}", edge.target),
                _ => edge.target,
            })
            .collect();

        writeln!(w, "{vertex}: {}", deps.join(", "))?;
    }
    Ok(())
}

fn dot_dependencies(graph: &Graph, w: &mut dyn Write) -> io::Result<()> {
    writeln!(w, "digraph dependencies {{")?;

    for vertex in graph.vertices() {
        let edges = graph.edges(&vertex);
        if edges.is_empty() {
            writeln!(w, "  \"{vertex}\"")?;
        }

        for edge in edges {
            let style = match edge.kind {
                Kind::Weak => " [style=dashed]",
                Kind::Strong => "",
            };
            writeln!(w, "  \"{vertex}\" -> \"{}\"{style}", edge.target)?;
        }
    }

    writeln!(w, "}}")
}

// Edges point from prerequisite to dependent, in build order.
fn dot_schedule(graph: &Graph, w: &mut dyn Write) -> io::Result<()> {
    writeln!(w, "digraph schedule {{")?;
    writeln!(w, "  rankdir=\"LR\"")?;
    writeln!(w, "  node [shape=box]")?;

    for vertex in graph.vertices() {
        let edges = graph.edges(&vertex);
        if edges.is_empty() {
            writeln!(w, "  \"{vertex}\"")?;
        }

        for edge in edges {
            writeln!(w, "  \"{}\" -> \"{vertex}\"", edge.target)?;
        }
    }

    writeln!(w, "}}")
}

fn github_matrix(selection: &[String], w: &mut dyn Write) -> io::Result<()> {
    serde_json::to_writer(&mut *w, selection)?;
    writeln!(w)
}

#[cfg(test)]
mod tests {
    use super::*;
    use monobuild_core::manifest::read_repo_manifest;
    use monobuild_core::{Project, Scope};

    const MANIFEST: &str = "a: b, c\nb: c\nc:\nd: !a\ne: !a, !b\n";

    fn project() -> Project {
        Project::load(read_repo_manifest(MANIFEST, false)).expect("valid manifest")
    }

    fn all() -> Plan {
        project().print_plan(&Scope::default()).expect("no scope")
    }

    fn rendered(plan: &Plan, format: Format) -> String {
        let mut out = Vec::new();
        render(plan, format, &mut out).expect("write to vec");
        String::from_utf8(out).expect("utf-8")
    }

    #[test]
    fn schedule_text_lists_only_strong_edges() {
        assert_eq!(
            rendered(&all(), Format::Schedule),
            "a: \nb: \nc: \nd: a\ne: a, b\n"
        );
    }

    #[test]
    fn dependencies_text_lists_every_edge() {
        assert_eq!(
            rendered(&all(), Format::Dependencies),
            "a: b, c\nb: c\nc: \nd: a\ne: a, b\n"
        );
    }

    #[test]
    fn full_text_marks_strong_edges() {
        assert_eq!(
            rendered(&all(), Format::Full),
            "a: b, c\nb: c\nc: \nd: !a\ne: !a, !b\n"
        );
    }

    #[test]
    fn full_text_reads_back_as_the_same_project() {
        let replayed = Project::load(read_repo_manifest(&rendered(&all(), Format::Full), false))
            .expect("replayable");
        assert_eq!(replayed.dependencies(), project().dependencies());
    }

    #[test]
    fn empty_plan_renders_nothing() {
        let plan = project()
            .diff_plan(&[], &Scope::default(), false)
            .expect("no scope");
        assert_eq!(rendered(&plan, Format::Schedule), "");
        assert_eq!(rendered(&plan, Format::DotDependencies), "digraph dependencies {\n}\n");
        assert_eq!(rendered(&plan, Format::GithubMatrix), "[]\n");
    }

    #[test]
    fn dot_dependencies_dashes_weak_edges() {
        let plan = project()
            .print_plan(&Scope {
                component: Some("a".to_string()),
                top_level: false,
            })
            .expect("known scope");

        assert_eq!(
            rendered(&plan, Format::DotDependencies),
            "digraph dependencies {\n\
             \x20 \"a\" -> \"b\" [style=dashed]\n\
             \x20 \"a\" -> \"c\" [style=dashed]\n\
             \x20 \"b\" -> \"c\" [style=dashed]\n\
             \x20 \"c\"\n\
             }\n"
        );
    }

    #[test]
    fn dot_schedule_points_from_prerequisite_to_dependent() {
        let plan = project()
            .diff_plan(&["a/x".to_string()], &Scope::default(), false)
            .expect("no scope");

        assert_eq!(
            rendered(&plan, Format::DotSchedule),
            "digraph schedule {\n\
             \x20 rankdir=\"LR\"\n\
             \x20 node [shape=box]\n\
             \x20 \"a\"\n\
             \x20 \"a\" -> \"d\"\n\
             \x20 \"a\" -> \"e\"\n\
             }\n"
        );
    }

    #[test]
    fn github_matrix_is_a_json_array() {
        let plan = project()
            .diff_plan(&["a/x".to_string()], &Scope::default(), false)
            .expect("no scope");
        assert_eq!(rendered(&plan, Format::GithubMatrix), "[\"a\",\"d\",\"e\"]\n");
    }

    #[test]
    fn dot_flag_wins_over_other_flags() {
        let args = OutputArgs {
            dot: true,
            full: true,
            ..OutputArgs::default()
        };
        assert_eq!(Format::from_flags(&args, true), Format::DotSchedule);

        let args = OutputArgs {
            dot: true,
            dependencies: true,
            ..OutputArgs::default()
        };
        assert_eq!(Format::from_flags(&args, false), Format::DotDependencies);
    }

    #[test]
    fn full_wins_over_dependencies() {
        let args = OutputArgs {
            full: true,
            dependencies: true,
            ..OutputArgs::default()
        };
        assert_eq!(Format::from_flags(&args, false), Format::Full);
        assert_eq!(
            Format::from_flags(&OutputArgs::default(), false),
            Format::Schedule
        );
    }
}
