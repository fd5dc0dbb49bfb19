//! The fixed dataset every session starts from.

use chrono::NaiveDate;

use crate::model::*;
use crate::store::Store;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    // Seed literals only; every tuple below is a valid calendar day.
    NaiveDate::from_ymd_opt(y, m, d).expect("seed date")
}

#[allow(clippy::too_many_arguments)]
fn student(
    id: u32,
    name: &str,
    grade: &str,
    age: u32,
    email: &str,
    class_id: u32,
    attendance: u32,
    fees_paid: bool,
    gender: Gender,
    contact: &str,
    admission: NaiveDate,
    leave: NaiveDate,
    discipline: Vec<DisciplineRecord>,
    history: Vec<GradeRecord>,
) -> Student {
    Student {
        id: StudentId(id),
        name: name.to_string(),
        grade: grade.to_string(),
        age,
        email: email.to_string(),
        class_id: ClassId(class_id),
        attendance,
        fees_paid,
        gender,
        emergency_contact: contact.to_string(),
        admission_date: admission,
        expected_leave_date: leave,
        discipline_records: discipline,
        grade_history: history,
    }
}

fn discipline(id: u32, term: &str, rating: u8, notes: &str) -> DisciplineRecord {
    DisciplineRecord {
        id,
        term: term.to_string(),
        rating,
        notes: notes.to_string(),
    }
}

fn history(id: u32, grade: &str, year: &str, average_score: f64) -> GradeRecord {
    GradeRecord {
        id,
        grade: grade.to_string(),
        year: year.to_string(),
        average_score,
    }
}

fn students() -> Vec<Student> {
    vec![
        student(
            1, "Alice Johnson", "5th", 11, "alice@example.com", 1, 95, true,
            Gender::Female, "+1-555-1001", date(2022, 1, 15), date(2026, 11, 30),
            vec![
                discipline(1, "Term 1", 4, "Excellent behavior"),
                discipline(2, "Term 2", 5, "Outstanding conduct"),
            ],
            vec![
                history(1, "4th", "2022-2023", 88.0),
                history(2, "5th", "2023-2024", 92.0),
            ],
        ),
        student(
            2, "Bob Smith", "4th", 10, "bob@example.com", 2, 88, false,
            Gender::Male, "+1-555-1002", date(2022, 2, 1), date(2027, 11, 30),
            vec![discipline(3, "Term 1", 3, "Good behavior")],
            vec![
                history(3, "3rd", "2022-2023", 82.0),
                history(4, "4th", "2023-2024", 85.0),
            ],
        ),
        student(
            3, "Charlie Brown", "6th", 12, "charlie@example.com", 1, 92, true,
            Gender::Male, "+1-555-1003", date(2021, 9, 1), date(2025, 11, 30),
            vec![
                discipline(4, "Term 1", 4, "Very good"),
                discipline(5, "Term 2", 3, "Needs improvement in focus"),
            ],
            vec![
                history(5, "5th", "2022-2023", 87.0),
                history(6, "6th", "2023-2024", 89.0),
            ],
        ),
        student(
            4, "Diana Prince", "3rd", 9, "diana@example.com", 2, 96, true,
            Gender::Female, "+1-555-1004", date(2023, 1, 10), date(2028, 11, 30),
            vec![discipline(6, "Term 1", 5, "Exemplary behavior")],
            vec![history(7, "3rd", "2023-2024", 94.0)],
        ),
        student(
            5, "Eve Wilson", "5th", 11, "eve@example.com", 1, 90, false,
            Gender::Female, "+1-555-1005", date(2022, 3, 15), date(2026, 11, 30),
            vec![discipline(7, "Term 1", 4, "Good conduct")],
            vec![
                history(8, "4th", "2022-2023", 86.0),
                history(9, "5th", "2023-2024", 88.0),
            ],
        ),
        student(
            6, "Frank Miller", "2nd", 8, "frank@example.com", 3, 93, true,
            Gender::Male, "+1-555-1006", date(2023, 9, 1), date(2029, 11, 30),
            vec![discipline(8, "Term 1", 4, "Well behaved")],
            vec![history(10, "2nd", "2023-2024", 91.0)],
        ),
        student(
            7, "Grace Lee", "7th", 13, "grace@example.com", 4, 89, true,
            Gender::Female, "+1-555-1007", date(2020, 8, 20), date(2024, 11, 30),
            vec![
                discipline(9, "Term 1", 3, "Average behavior"),
                discipline(10, "Term 2", 4, "Improving"),
            ],
            vec![
                history(11, "6th", "2022-2023", 84.0),
                history(12, "7th", "2023-2024", 87.0),
            ],
        ),
        student(
            8, "Henry Davis", "1st", 7, "henry@example.com", 5, 97, false,
            Gender::Male, "+1-555-1008", date(2023, 8, 15), date(2029, 11, 30),
            vec![discipline(11, "Term 1", 5, "Perfect behavior")],
            vec![history(13, "1st", "2023-2024", 95.0)],
        ),
        student(
            9, "Ivy Chen", "8th", 14, "ivy@example.com", 6, 85, true,
            Gender::Female, "+1-555-1009", date(2019, 9, 5), date(2023, 11, 30),
            vec![
                discipline(12, "Term 1", 2, "Needs attention"),
                discipline(13, "Term 2", 3, "Some improvement"),
            ],
            vec![
                history(14, "7th", "2022-2023", 78.0),
                history(15, "8th", "2023-2024", 81.0),
            ],
        ),
        student(
            10, "Jack Wilson", "4th", 10, "jack@example.com", 2, 91, true,
            Gender::Male, "+1-555-1010", date(2022, 4, 1), date(2027, 11, 30),
            vec![discipline(14, "Term 1", 4, "Good student")],
            vec![
                history(16, "3rd", "2022-2023", 89.0),
                history(17, "4th", "2023-2024", 90.0),
            ],
        ),
    ]
}

fn teachers() -> Vec<Teacher> {
    let teacher = |id: u32,
                   name: &str,
                   subject: &str,
                   email: &str,
                   phone: &str,
                   role: StaffRole,
                   class_id: Option<u32>,
                   age: u32,
                   gender: Gender,
                   tsc_no: &str,
                   combination: &str| Teacher {
        id: TeacherId(id),
        name: name.to_string(),
        subject: subject.to_string(),
        email: email.to_string(),
        phone: phone.to_string(),
        role,
        class_id: class_id.map(ClassId),
        age,
        gender,
        tsc_no: tsc_no.to_string(),
        subject_combination: combination.to_string(),
    };
    vec![
        teacher(
            1, "Dr. Sarah Johnson", "Mathematics", "sarah.johnson@school.com",
            "+1-555-0101", StaffRole::Headteacher, None, 45, Gender::Female,
            "TSC001", "Mathematics, Physics",
        ),
        teacher(
            2, "Mr. Michael Chen", "Science", "michael.chen@school.com",
            "+1-555-0102", StaffRole::Deputy, None, 40, Gender::Male,
            "TSC002", "Chemistry, Biology",
        ),
        teacher(
            3, "Ms. Emily Davis", "English", "emily.davis@school.com",
            "+1-555-0103", StaffRole::Classteacher, Some(1), 35, Gender::Female,
            "TSC003", "English, Literature",
        ),
        teacher(
            4, "Mr. Robert Wilson", "History", "robert.wilson@school.com",
            "+1-555-0104", StaffRole::Subjectteacher, None, 38, Gender::Male,
            "TSC004", "History, Geography",
        ),
        teacher(
            5, "Mrs. Lisa Brown", "Art", "lisa.brown@school.com",
            "+1-555-0105", StaffRole::Classteacher, Some(2), 42, Gender::Female,
            "TSC005", "Art, Music",
        ),
    ]
}

fn classes() -> Vec<Class> {
    vec![
        Class {
            id: ClassId(1),
            name: "Grade 5A".to_string(),
            teacher_id: TeacherId(3),
            student_ids: vec![StudentId(1), StudentId(3), StudentId(5)],
            class_rep: "Alice Johnson".to_string(),
        },
        Class {
            id: ClassId(2),
            name: "Grade 4B".to_string(),
            teacher_id: TeacherId(5),
            student_ids: vec![StudentId(2), StudentId(4)],
            class_rep: "Bob Smith".to_string(),
        },
    ]
}

fn subjects() -> Vec<Subject> {
    let subject = |id: u32, name: &str, teacher_id: u32, class_ids: &[u32]| Subject {
        id: SubjectId(id),
        name: name.to_string(),
        teacher_id: TeacherId(teacher_id),
        class_ids: class_ids.iter().copied().map(ClassId).collect(),
    };
    vec![
        subject(1, "Mathematics", 1, &[1, 2]),
        subject(2, "Science", 2, &[1, 2]),
        subject(3, "English", 3, &[1]),
        subject(4, "History", 4, &[2]),
        subject(5, "Art", 5, &[1, 2]),
    ]
}

fn attendance() -> Vec<Attendance> {
    let mark = |id: u32, student_id: u32, day: NaiveDate, present: bool| Attendance {
        id: AttendanceId(id),
        student_id: StudentId(student_id),
        date: day,
        present,
    };
    vec![
        mark(1, 1, date(2024, 1, 15), true),
        mark(2, 2, date(2024, 1, 15), false),
        mark(3, 3, date(2024, 1, 15), true),
    ]
}

fn results() -> Vec<ExamResult> {
    vec![
        ExamResult {
            id: ResultId(1),
            student_id: StudentId(1),
            subject_id: SubjectId(1),
            score: 85.0,
            grade: "A".to_string(),
            term: "Term 1".to_string(),
        },
        ExamResult {
            id: ResultId(2),
            student_id: StudentId(2),
            subject_id: SubjectId(2),
            score: 78.0,
            grade: "B".to_string(),
            term: "Term 1".to_string(),
        },
    ]
}

fn fees() -> Vec<Fee> {
    vec![
        Fee {
            id: FeeId(1),
            student_id: StudentId(1),
            amount: 500.0,
            due_date: date(2024, 2, 1),
            paid: true,
        },
        Fee {
            id: FeeId(2),
            student_id: StudentId(2),
            amount: 500.0,
            due_date: date(2024, 2, 1),
            paid: false,
        },
    ]
}

fn timetable() -> Vec<TimetableEntry> {
    vec![
        TimetableEntry {
            id: TimetableEntryId(1),
            day: "Monday".to_string(),
            start_time: "08:00".to_string(),
            end_time: "09:00".to_string(),
            subject_id: SubjectId(1),
            teacher_id: TeacherId(1),
            class_id: ClassId(1),
        },
        TimetableEntry {
            id: TimetableEntryId(2),
            day: "Monday".to_string(),
            start_time: "09:00".to_string(),
            end_time: "10:00".to_string(),
            subject_id: SubjectId(2),
            teacher_id: TeacherId(2),
            class_id: ClassId(1),
        },
    ]
}

fn users() -> Vec<User> {
    let user = |id: u32, name: &str, role: Role, username: &str, password: &str, entity_id: u32| {
        User {
            id: UserId(id),
            name: name.to_string(),
            role,
            username: username.to_string(),
            password: password.to_string(),
            entity_id,
        }
    };
    vec![
        user(1, "Dr. Sarah Johnson", Role::Headteacher, "head", "admin123", 1),
        user(2, "Mr. Michael Chen", Role::Deputy, "deputy", "admin123", 2),
        user(3, "Ms. Emily Davis", Role::Classteacher, "teacher1", "admin123", 3),
        user(4, "Mr. Robert Wilson", Role::Subjectteacher, "teacher2", "admin123", 4),
        user(5, "Alice Johnson", Role::Student, "student1", "student123", 1),
    ]
}

/// A store holding the full seed dataset. Academic year, terms, important
/// days and class-subject assignments start empty.
pub fn seeded_store() -> Store {
    Store::new(
        students(),
        teachers(),
        classes(),
        subjects(),
        attendance(),
        results(),
        fees(),
        timetable(),
        users(),
    )
}
