//! Info overlay for the selected node: breadcrumb, link and details.

use std::fmt::Write as _;

use bevy::prelude::*;

use crate::{
    graph::{FlattenedGraph, GraphNode, NodeDetails, NodeId},
    scene::{Overlay, SceneState},
};

#[derive(Component)]
pub struct InfoPanel;

#[derive(Component)]
pub struct InfoPanelText;

/// `Root / Parent / Node`, built by walking parent links
pub fn breadcrumb_line(graph: &FlattenedGraph, id: &NodeId) -> String {
    graph
        .breadcrumb(id)
        .iter()
        .map(|node| node.name.as_str())
        .collect::<Vec<_>>()
        .join(" / ")
}

/// Full panel text for a node, or `None` if the id is unknown
pub fn info_panel_text(graph: &FlattenedGraph, id: &NodeId) -> Option<String> {
    let node = graph.node(id)?;
    let mut out = String::new();

    let _ = writeln!(out, "{}", breadcrumb_line(graph, id));
    let _ = writeln!(out);
    let _ = writeln!(out, "{}", node.name);
    write_header(&mut out, node);
    if let Some(details) = &node.details {
        write_details(&mut out, details);
    }
    let _ = write!(out, "\n[Esc] close");

    Some(out)
}

fn write_header(out: &mut String, node: &GraphNode) {
    if let Some(link) = &node.link {
        let _ = writeln!(out, "{link}");
    }
    if let Some(modified) = &node.last_modified {
        let _ = writeln!(out, "Last modified: {modified}");
    }
}

fn write_list(out: &mut String, title: &str, items: impl IntoIterator<Item = String>) {
    let mut items = items.into_iter().peekable();
    if items.peek().is_none() {
        return;
    }
    let _ = writeln!(out, "\n{title}");
    for item in items {
        let _ = writeln!(out, "  - {item}");
    }
}

fn write_details(out: &mut String, details: &NodeDetails) {
    if let Some(description) = &details.description {
        let fields = [
            ("", &description.summary),
            ("Problem solved: ", &description.problem_solved),
            ("Impact: ", &description.impact),
            ("Relevance: ", &description.relevance),
            ("Role: ", &description.role),
        ];
        let mut wrote_any = false;
        for (label, value) in fields {
            if let Some(value) = value {
                if !wrote_any {
                    let _ = writeln!(out);
                    wrote_any = true;
                }
                let _ = writeln!(out, "{label}{value}");
            }
        }
        if !description.technologies.is_empty() {
            let _ = writeln!(out, "Technologies: {}", description.technologies.join(", "));
        }
        write_list(out, "Challenges", description.challenges.iter().cloned());
    }

    if let Some(architecture) = &details.architecture {
        if let Some(overview) = &architecture.overview {
            let _ = writeln!(out, "\nArchitecture\n{overview}");
        }
        write_list(
            out,
            "Components",
            architecture
                .components
                .iter()
                .map(|c| format!("{}: {}", c.name, c.description)),
        );
    }

    if let Some(technical) = &details.technical_details {
        write_list(
            out,
            "Design decisions",
            technical
                .design_decisions
                .iter()
                .map(|d| format!("{}: {}", d.decision, d.reasoning)),
        );
        write_list(
            out,
            "Performance",
            technical
                .performance_optimizations
                .iter()
                .map(|p| format!("{}: {}", p.optimization, p.impact)),
        );
        write_list(out, "Lessons learned", technical.lessons_learned.iter().cloned());
    }
}

pub fn spawn_info_panel(commands: &mut Commands) {
    commands
        .spawn((
            Node {
                position_type: PositionType::Absolute,
                right: Val::Px(16.0),
                top: Val::Px(16.0),
                width: Val::Px(380.0),
                max_height: Val::Percent(85.0),
                padding: UiRect::all(Val::Px(14.0)),
                flex_direction: FlexDirection::Column,
                overflow: Overflow::clip(),
                ..default()
            },
            BackgroundColor(Color::srgba(0.06, 0.05, 0.12, 0.92)),
            Visibility::Hidden,
            Interaction::default(),
            InfoPanel,
        ))
        .with_children(|parent| {
            parent.spawn((
                Text::new(""),
                TextFont {
                    font_size: 14.0,
                    ..default()
                },
                TextColor(Color::srgb(0.88, 0.88, 0.92)),
                InfoPanelText,
            ));
        });
}

/// System: show the panel for the selected node
pub fn update_info_panel(
    state: Res<SceneState>,
    graph: Res<FlattenedGraph>,
    mut panels: Query<&mut Visibility, With<InfoPanel>>,
    mut texts: Query<&mut Text, With<InfoPanelText>>,
) {
    if !state.is_changed() && !graph.is_changed() {
        return;
    }

    let content = match (state.active_overlay(), state.selected_node()) {
        (Overlay::InfoPanel, Some(id)) => info_panel_text(&graph, id),
        _ => None,
    };

    for mut visibility in &mut panels {
        visibility.set_if_neq(if content.is_some() {
            Visibility::Visible
        } else {
            Visibility::Hidden
        });
    }
    if let Some(content) = content {
        for mut text in &mut texts {
            **text = content.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::GraphStore;

    fn graph() -> FlattenedGraph {
        GraphStore::from_json(
            r#"{ "root": {
                "id": "root", "name": "Neuron", "position": [0, 0, 0],
                "children": [{
                    "id": "projects", "name": "Projects", "position": [1, 0, 0],
                    "children": [{
                        "id": "p1", "name": "Scene", "position": [2, 0, 0], "type": "project",
                        "link": "https://example.org/scene",
                        "details": {
                            "description": { "summary": "A scene.", "technologies": ["Rust", "Bevy"] },
                            "technical_details": {
                                "design_decisions": [{ "decision": "ECS", "reasoning": "Systems stay small" }]
                            }
                        }
                    }]
                }]
            } }"#,
        )
        .unwrap()
    }

    #[test]
    fn test_breadcrumb_line() {
        assert_eq!(
            breadcrumb_line(&graph(), &NodeId::new("p1")),
            "Neuron / Projects / Scene"
        );
        assert_eq!(breadcrumb_line(&graph(), &NodeId::new("root")), "Neuron");
    }

    #[test]
    fn test_panel_text_includes_details() {
        let text = info_panel_text(&graph(), &NodeId::new("p1")).unwrap();

        assert!(text.starts_with("Neuron / Projects / Scene\n"));
        assert!(text.contains("https://example.org/scene"));
        assert!(text.contains("A scene."));
        assert!(text.contains("Technologies: Rust, Bevy"));
        assert!(text.contains("  - ECS: Systems stay small"));
        assert!(!text.contains("Lessons learned"), "Empty sections are skipped");
    }

    #[test]
    fn test_unknown_node_has_no_panel() {
        assert!(info_panel_text(&graph(), &NodeId::new("missing")).is_none());
    }
}
