use crate::model::*;

/// Next id for a collection: one above the current maximum, or 1 when the
/// collection is empty. Always derived from the live records, never a
/// counter, so deleting the max-id record frees that value for reuse.
fn next_raw_id<T>(items: &[T], id_of: impl Fn(&T) -> u32) -> u32 {
    items.iter().map(id_of).max().map_or(1, |max| max + 1)
}

/// Session-scoped registry of every entity collection. One instance per
/// running session; mutations rebuild the affected collection so each read
/// observes a fresh snapshot.
///
/// The store never validates field values or referential ids. Update and
/// delete with an unknown id are silent no-ops.
pub struct Store {
    students: Vec<Student>,
    teachers: Vec<Teacher>,
    classes: Vec<Class>,
    subjects: Vec<Subject>,
    attendance: Vec<Attendance>,
    results: Vec<ExamResult>,
    fees: Vec<Fee>,
    timetable: Vec<TimetableEntry>,
    academic_year: Option<AcademicYear>,
    terms: Vec<Term>,
    important_days: Vec<ImportantDay>,
    users: Vec<User>,
    class_subjects: Vec<ClassSubject>,
}

macro_rules! crud_impl {
    (
        $field:ident, $record:ty, $new:ty, $patch:ty, $id:ident,
        $list_fn:ident, $add_fn:ident, $update_fn:ident, $delete_fn:ident
    ) => {
        pub fn $list_fn(&self) -> &[$record] {
            &self.$field
        }

        pub fn $add_fn(&mut self, new: $new) -> $id {
            let id = $id(next_raw_id(&self.$field, |r| r.id.0));
            let mut next = self.$field.clone();
            next.push(new.into_record(id));
            self.$field = next;
            id
        }

        pub fn $update_fn(&mut self, id: $id, patch: &$patch) {
            self.$field = self
                .$field
                .iter()
                .map(|r| {
                    let mut r = r.clone();
                    if r.id == id {
                        patch.apply(&mut r);
                    }
                    r
                })
                .collect();
        }

        pub fn $delete_fn(&mut self, id: $id) {
            self.$field = self
                .$field
                .iter()
                .filter(|r| r.id != id)
                .cloned()
                .collect();
        }
    };
}

impl Store {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        students: Vec<Student>,
        teachers: Vec<Teacher>,
        classes: Vec<Class>,
        subjects: Vec<Subject>,
        attendance: Vec<Attendance>,
        results: Vec<ExamResult>,
        fees: Vec<Fee>,
        timetable: Vec<TimetableEntry>,
        users: Vec<User>,
    ) -> Self {
        Store {
            students,
            teachers,
            classes,
            subjects,
            attendance,
            results,
            fees,
            timetable,
            academic_year: None,
            terms: Vec::new(),
            important_days: Vec::new(),
            users,
            class_subjects: Vec::new(),
        }
    }

    crud_impl!(
        students, Student, NewStudent, StudentPatch, StudentId,
        students, add_student, update_student, delete_student
    );
    crud_impl!(
        teachers, Teacher, NewTeacher, TeacherPatch, TeacherId,
        teachers, add_teacher, update_teacher, delete_teacher
    );
    crud_impl!(
        classes, Class, NewClass, ClassPatch, ClassId,
        classes, add_class, update_class, delete_class
    );
    crud_impl!(
        subjects, Subject, NewSubject, SubjectPatch, SubjectId,
        subjects, add_subject, update_subject, delete_subject
    );
    crud_impl!(
        attendance, Attendance, NewAttendance, AttendancePatch, AttendanceId,
        attendance, add_attendance, update_attendance, delete_attendance
    );
    crud_impl!(
        results, ExamResult, NewExamResult, ExamResultPatch, ResultId,
        results, add_result, update_result, delete_result
    );
    crud_impl!(
        fees, Fee, NewFee, FeePatch, FeeId,
        fees, add_fee, update_fee, delete_fee
    );
    crud_impl!(
        timetable, TimetableEntry, NewTimetableEntry, TimetableEntryPatch, TimetableEntryId,
        timetable, add_timetable_entry, update_timetable_entry, delete_timetable_entry
    );
    crud_impl!(
        terms, Term, NewTerm, TermPatch, TermId,
        terms, add_term, update_term, delete_term
    );
    crud_impl!(
        important_days, ImportantDay, NewImportantDay, ImportantDayPatch, ImportantDayId,
        important_days, add_important_day, update_important_day, delete_important_day
    );

    pub fn users(&self) -> &[User] {
        &self.users
    }

    pub fn academic_year(&self) -> Option<&AcademicYear> {
        self.academic_year.as_ref()
    }

    /// Replaces the academic-year singleton outright. `None` clears it. An
    /// input without an id keeps the current singleton's id, defaulting to 1.
    pub fn set_academic_year(&mut self, input: Option<AcademicYearInput>) {
        self.academic_year = input.map(|y| {
            let id = y
                .id
                .or_else(|| self.academic_year.as_ref().map(|cur| cur.id))
                .unwrap_or(AcademicYearId(1));
            AcademicYear {
                id,
                name: y.name,
                start_date: y.start_date,
                end_date: y.end_date,
            }
        });
    }

    pub fn class_subjects(&self) -> &[ClassSubject] {
        &self.class_subjects
    }

    /// Raw setter for the class-subject join collection: the caller computes
    /// the full next collection (ids included) and it is taken as given.
    pub fn set_class_subjects(&mut self, items: Vec<ClassSubject>) {
        self.class_subjects = items;
    }

    // Display-time lookups. A miss means a dangling reference; callers
    // substitute a placeholder rather than failing.
    pub fn student(&self, id: StudentId) -> Option<&Student> {
        self.students.iter().find(|s| s.id == id)
    }

    pub fn teacher(&self, id: TeacherId) -> Option<&Teacher> {
        self.teachers.iter().find(|t| t.id == id)
    }

    pub fn class(&self, id: ClassId) -> Option<&Class> {
        self.classes.iter().find(|c| c.id == id)
    }

    pub fn subject(&self, id: SubjectId) -> Option<&Subject> {
        self.subjects.iter().find(|s| s.id == id)
    }

    pub fn class_of_teacher(&self, teacher_id: TeacherId) -> Option<&Class> {
        self.classes.iter().find(|c| c.teacher_id == teacher_id)
    }

    pub fn find_user(&self, username: &str, password: &str, role: Role) -> Option<&User> {
        self.users
            .iter()
            .find(|u| u.username == username && u.password == password && u.role == role)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seed;
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
    }

    fn new_student(name: &str) -> NewStudent {
        NewStudent {
            name: name.to_string(),
            grade: "5th".to_string(),
            age: 11,
            email: format!("{}@example.com", name.to_lowercase()),
            class_id: ClassId(1),
            attendance: 90,
            fees_paid: true,
            gender: Gender::Female,
            emergency_contact: "+1-555-0000".to_string(),
            admission_date: date(2022, 1, 15),
            expected_leave_date: date(2026, 11, 30),
            discipline_records: Vec::new(),
            grade_history: Vec::new(),
        }
    }

    #[test]
    fn add_allocates_one_above_current_max() {
        let mut store = seed::seeded_store();
        assert_eq!(store.students().len(), 10);
        let id = store.add_student(new_student("Zed"));
        assert_eq!(id, StudentId(11));
        let added = store.student(id).expect("added student");
        assert_eq!(added.name, "Zed");
    }

    #[test]
    fn delete_then_add_reuses_freed_max() {
        let mut store = seed::seeded_store();
        store.delete_student(StudentId(10));
        assert_eq!(store.students().len(), 9);
        // Max of the survivors is 9, so the freed id 10 comes back.
        let id = store.add_student(new_student("After"));
        assert_eq!(id, StudentId(10));
    }

    #[test]
    fn add_into_empty_collection_starts_at_one() {
        let mut store = seed::seeded_store();
        assert!(store.terms().is_empty());
        let id = store.add_term(NewTerm {
            name: "Term 1".to_string(),
            start_date: date(2024, 1, 8),
            end_date: date(2024, 4, 5),
            academic_year_id: AcademicYearId(1),
        });
        assert_eq!(id, TermId(1));
    }

    #[test]
    fn update_unknown_id_is_a_no_op() {
        let mut store = seed::seeded_store();
        let before: Vec<f64> = store.results().iter().map(|r| r.score).collect();
        store.update_result(
            ResultId(99),
            &ExamResultPatch {
                score: Some(1.0),
                ..Default::default()
            },
        );
        let after: Vec<f64> = store.results().iter().map(|r| r.score).collect();
        assert_eq!(before, after);
    }

    #[test]
    fn delete_keeps_relative_order_of_survivors() {
        let mut store = seed::seeded_store();
        store.delete_student(StudentId(5));
        let ids: Vec<u32> = store.students().iter().map(|s| s.id.0).collect();
        assert_eq!(ids, vec![1, 2, 3, 4, 6, 7, 8, 9, 10]);
        // Deleting an absent id changes nothing.
        store.delete_student(StudentId(5));
        assert_eq!(store.students().len(), 9);
    }

    #[test]
    fn academic_year_singleton_defaults_and_keeps_id() {
        let mut store = seed::seeded_store();
        assert!(store.academic_year().is_none());
        store.set_academic_year(Some(AcademicYearInput {
            id: None,
            name: "2024-2025".to_string(),
            start_date: date(2024, 1, 8),
            end_date: date(2024, 11, 29),
        }));
        assert_eq!(store.academic_year().map(|y| y.id), Some(AcademicYearId(1)));

        // Replacing without an id preserves the existing singleton's id.
        store.set_academic_year(Some(AcademicYearInput {
            id: Some(AcademicYearId(7)),
            name: "2025-2026".to_string(),
            start_date: date(2025, 1, 6),
            end_date: date(2025, 11, 28),
        }));
        store.set_academic_year(Some(AcademicYearInput {
            id: None,
            name: "renamed".to_string(),
            start_date: date(2025, 1, 6),
            end_date: date(2025, 11, 28),
        }));
        assert_eq!(store.academic_year().map(|y| y.id), Some(AcademicYearId(7)));

        store.set_academic_year(None);
        assert!(store.academic_year().is_none());
    }

    #[test]
    fn class_subjects_replace_takes_collection_as_given() {
        let mut store = seed::seeded_store();
        store.set_class_subjects(vec![ClassSubject {
            id: ClassSubjectId(1717171717),
            class_id: ClassId(1),
            subject_id: SubjectId(3),
            teacher_id: Some(TeacherId(3)),
        }]);
        assert_eq!(store.class_subjects().len(), 1);
        assert_eq!(store.class_subjects()[0].id, ClassSubjectId(1717171717));

        store.set_class_subjects(Vec::new());
        assert!(store.class_subjects().is_empty());
    }

    #[test]
    fn dangling_references_survive_deletes() {
        let mut store = seed::seeded_store();
        // Result 1 references student 1; deleting the student leaves the
        // result in place with a dangling student id.
        store.delete_student(StudentId(1));
        let result = store.results().iter().find(|r| r.id == ResultId(1));
        assert_eq!(result.map(|r| r.student_id), Some(StudentId(1)));
        assert!(store.student(StudentId(1)).is_none());
    }
}
