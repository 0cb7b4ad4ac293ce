//! Client-side filtering and sorting over fetched student lists.

use serde_json::Value;
use std::cmp::Ordering;

/// Display name of a student payload (`name`, or `first_name last_name`).
pub fn student_name(student: &Value) -> String {
    if let Some(name) = student.get("name").and_then(Value::as_str) {
        return name.to_string();
    }
    let part = |key: &str| student.get(key).and_then(Value::as_str).unwrap_or_default();
    format!("{} {}", part("first_name"), part("last_name"))
        .trim()
        .to_string()
}

/// Case-insensitive match on name, email, or student number.
pub fn filter_students<'a>(students: &'a [Value], query: &str) -> Vec<&'a Value> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return students.iter().collect();
    }
    students
        .iter()
        .filter(|student| {
            let email = student.get("email").and_then(Value::as_str).unwrap_or_default();
            let number = student
                .get("student_number")
                .or_else(|| student.get("roll_number"))
                .map(|v| match v {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                })
                .unwrap_or_default();
            student_name(student).to_lowercase().contains(&needle)
                || email.to_lowercase().contains(&needle)
                || number.to_lowercase().contains(&needle)
        })
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StudentSort {
    Name,
    /// Highest average first
    Average,
}

pub fn sort_students(students: &mut [Value], by: StudentSort) {
    match by {
        StudentSort::Name => {
            students.sort_by_key(|s| student_name(s).to_lowercase());
        }
        StudentSort::Average => students.sort_by(|a, b| {
            let avg = |s: &Value| s.get("average").and_then(Value::as_f64);
            match (avg(a), avg(b)) {
                (Some(x), Some(y)) => y.partial_cmp(&x).unwrap_or(Ordering::Equal),
                (Some(_), None) => Ordering::Less,
                (None, Some(_)) => Ordering::Greater,
                (None, None) => Ordering::Equal,
            }
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn roster() -> Vec<Value> {
        vec![
            json!({"id": 1, "name": "Zoe Park", "email": "zoe@school.org", "average": 81.5}),
            json!({"id": 2, "first_name": "adam", "last_name": "Cole", "email": "ac@school.org"}),
            json!({"id": 3, "name": "Mia Chen", "student_number": 1044, "average": 92.0}),
        ]
    }

    #[test]
    fn test_filter_by_name_email_and_number() {
        let students = roster();
        assert_eq!(filter_students(&students, "ZOE").len(), 1);
        assert_eq!(filter_students(&students, "school.org").len(), 2);
        assert_eq!(filter_students(&students, "1044")[0]["id"], 3);
        assert_eq!(filter_students(&students, "  ").len(), 3);
    }

    #[test]
    fn test_sort_by_name_and_average() {
        let mut students = roster();
        sort_students(&mut students, StudentSort::Name);
        assert_eq!(student_name(&students[0]), "adam Cole");

        sort_students(&mut students, StudentSort::Average);
        assert_eq!(students[0]["id"], 3);
        assert_eq!(students[2]["id"], 2);
    }
}
