use api::ProgramStore;
use dioxus::prelude::*;
use domain::{ClassInfo, TeacherInfo};

use crate::use_backend;

/// A class with its teacher resolved to a name.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct ClassRow {
    pub id: String,
    pub name: String,
    pub program: String,
    pub teacher: Option<String>,
}

/// Join classes to teachers, grouped by program then class name.
pub(crate) fn class_rows(classes: &[ClassInfo], teachers: &[TeacherInfo]) -> Vec<ClassRow> {
    let mut rows: Vec<ClassRow> = classes
        .iter()
        .map(|class| ClassRow {
            id: class.id.clone(),
            name: class.name.clone(),
            program: class.program_name.clone().unwrap_or_default(),
            teacher: class
                .teacher_id
                .as_deref()
                .and_then(|id| teachers.iter().find(|t| t.id == id))
                .map(TeacherInfo::full_name),
        })
        .collect();
    rows.sort_by(|a, b| (&a.program, &a.name).cmp(&(&b.program, &b.name)));
    rows
}

/// Teachers without a class.
pub(crate) fn unassigned_teachers(classes: &[ClassInfo], teachers: &[TeacherInfo]) -> Vec<String> {
    teachers
        .iter()
        .filter(|t| !classes.iter().any(|c| c.teacher_id.as_deref() == Some(t.id.as_str())))
        .map(TeacherInfo::full_name)
        .collect()
}

/// Programs and class assignments. Both lists reload whenever `refresh`
/// changes, which the shell bumps on every entry into this tab.
#[component]
pub fn ProgramsView(refresh: u64) -> Element {
    let backend = use_backend();
    let mut epoch = use_signal(|| refresh);
    if *epoch.peek() != refresh {
        epoch.set(refresh);
    }

    let mut lists = use_resource(move || {
        let backend = backend.clone();
        let epoch = epoch();
        async move {
            tracing::debug!(epoch, "loading classes and teachers");
            let classes = backend.list_classes().await.map_err(|e| e.to_string())?;
            let teachers = backend.list_teachers().await.map_err(|e| e.to_string())?;
            Ok::<_, String>((classes, teachers))
        }
    });

    rsx! {
        div {
            class: "view",
            div {
                class: "view-header",
                h1 { "Programs" }
                button {
                    class: "btn",
                    onclick: move |_| lists.restart(),
                    "Refresh"
                }
            }
            {match lists.cloned() {
                None => rsx! { div { class: "view-placeholder", "Loading classes..." } },
                Some(Err(e)) => rsx! { div { class: "view-error", "Could not load programs: {e}" } },
                Some(Ok((classes, teachers))) => {
                    let rows = class_rows(&classes, &teachers);
                    let idle = unassigned_teachers(&classes, &teachers);
                    rsx! {
                        table {
                            class: "data-table",
                            thead {
                                tr {
                                    th { "Program" }
                                    th { "Class" }
                                    th { "Teacher" }
                                }
                            }
                            tbody {
                                for row in rows {
                                    tr {
                                        key: "{row.id}",
                                        td { "{row.program}" }
                                        td { "{row.name}" }
                                        td {
                                            if let Some(teacher) = row.teacher {
                                                "{teacher}"
                                            } else {
                                                span { class: "muted", "Unassigned" }
                                            }
                                        }
                                    }
                                }
                            }
                        }
                        if !idle.is_empty() {
                            div {
                                class: "view-section",
                                h2 { "Teachers without a class" }
                                ul {
                                    for name in idle {
                                        li { key: "{name}", "{name}" }
                                    }
                                }
                            }
                        }
                    }
                }
            }}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn class(id: &str, name: &str, program: &str, teacher: Option<&str>) -> ClassInfo {
        ClassInfo {
            id: id.to_string(),
            name: name.to_string(),
            program_name: Some(program.to_string()),
            teacher_id: teacher.map(str::to_string),
        }
    }

    fn teacher(id: &str, first: &str, last: &str) -> TeacherInfo {
        TeacherInfo {
            id: id.to_string(),
            first_name: first.to_string(),
            last_name: last.to_string(),
            email: None,
        }
    }

    #[test]
    fn test_rows_resolve_teachers_and_sort() {
        let classes = vec![
            class("c-2", "Robins", "Preschool", Some("t-9")),
            class("c-1", "Bluebirds", "Preschool", Some("t-1")),
            class("c-3", "Owls", "After School", None),
        ];
        let teachers = vec![teacher("t-1", "Grace", "Hopper"), teacher("t-2", "Alan", "Turing")];
        let rows = class_rows(&classes, &teachers);

        let names: Vec<&str> = rows.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["Owls", "Bluebirds", "Robins"]);
        assert_eq!(rows[1].teacher.as_deref(), Some("Grace Hopper"));
        // Unknown teacher ids show as unassigned.
        assert_eq!(rows[2].teacher, None);

        assert_eq!(unassigned_teachers(&classes, &teachers), vec!["Alan Turing"]);
    }
}
