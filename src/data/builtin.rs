use super::parse::RawSkillRecord;

// Fallback dataset compiled into the binary: (id, label, group, years).
// Groups: 1 frameworks, 2 languages, 3 services/APIs, 4 tooling, 5 styling/viz.
const BUILTIN_SKILLS: &[(&str, &str, u32, f32)] = &[
    ("react", "React", 1, 8.0),
    ("react-native", "React\nNative", 1, 6.0),
    ("three-js", "Three.js", 1, 2.0),
    ("typescript", "TypeScript", 2, 7.0),
    ("javascript", "JavaScript", 2, 10.0),
    ("html-css", "HTML\n& CSS", 2, 10.0),
    ("graphql", "GraphQL", 3, 5.0),
    ("rest", "REST", 3, 9.0),
    ("web3", "Web3", 3, 1.0),
    ("azure", "Azure", 4, 4.0),
    ("github-actions", "GitHub\nActions", 4, 4.0),
    ("cypress", "Cypress", 4, 3.0),
    ("styled-components", "Styled\nComponents", 5, 6.0),
    ("material-ui", "Material-UI", 5, 5.0),
    ("d3", "D3", 5, 4.0),
];

pub(super) fn builtin_records() -> Vec<RawSkillRecord> {
    BUILTIN_SKILLS
        .iter()
        .map(|&(id, label, group, size)| RawSkillRecord {
            id: id.to_string(),
            label: label.to_string(),
            group,
            size,
        })
        .collect()
}
