//! Dedup keys for list-valued profile fields.

use crate::profile::models::{BookmarkShape, JobBookmark, SchoolBookmark};

/// Saved jobs are unique by name.
pub fn job_key(job: &JobBookmark) -> String {
    job.job_name.clone()
}

/// Identity of a school bookmark. Each shape is keyed on its own fields, so a
/// school-only bookmark and a school+department bookmark for the same school
/// never collide.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SchoolBookmarkKey {
    School {
        school_id: String,
    },
    SchoolDepartment {
        school_id: String,
        department_id: String,
    },
    Department {
        department_id: String,
    },
}

pub fn school_bookmark_key(bookmark: &SchoolBookmark) -> SchoolBookmarkKey {
    let department_id = bookmark.department_id.clone().unwrap_or_default();
    match bookmark.shape() {
        BookmarkShape::SchoolOnly => SchoolBookmarkKey::School {
            school_id: bookmark.school_id.clone(),
        },
        BookmarkShape::SchoolDepartment => SchoolBookmarkKey::SchoolDepartment {
            school_id: bookmark.school_id.clone(),
            department_id,
        },
        BookmarkShape::DepartmentOnly => SchoolBookmarkKey::Department { department_id },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn saved(school_id: &str, department_id: Option<&str>, date: &str) -> SchoolBookmark {
        SchoolBookmark {
            school_id: school_id.to_string(),
            school_name: if school_id.is_empty() {
                String::new()
            } else {
                format!("학교 {school_id}")
            },
            school_type: String::new(),
            region: String::new(),
            department_id: department_id.map(String::from),
            department_name: String::new(),
            saved_date: date.to_string(),
        }
    }

    #[test]
    fn test_same_school_different_shapes_do_not_collide() {
        let school_only = school_bookmark_key(&saved("1", None, "2024-01-01"));
        let with_dept = school_bookmark_key(&saved("1", Some("101"), "2024-01-01"));
        assert_ne!(school_only, with_dept);
    }

    #[test]
    fn test_department_only_ignores_school_fields() {
        let a = school_bookmark_key(&saved("", Some("201"), "2024-01-01"));
        let b = school_bookmark_key(&saved("", Some("201"), "2024-02-02"));
        assert_eq!(a, b);
        assert_ne!(a, school_bookmark_key(&saved("1", Some("201"), "2024-01-01")));
    }

    #[test]
    fn test_job_key_ignores_description() {
        let a = JobBookmark {
            job_id: None,
            job_name: "연구원".into(),
            job_category: None,
            job_description: "과학 관련 직업".into(),
            saved_date: "2024-01-01".into(),
        };
        let b = JobBookmark {
            job_description: "직업흥미검사(H) 검사 결과 추천 직업".into(),
            ..a.clone()
        };
        assert_eq!(job_key(&a), job_key(&b));
    }
}
