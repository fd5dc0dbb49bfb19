use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};

macro_rules! id_newtype {
    ($name:ident) => {
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(pub u32);
    };
}

id_newtype!(StudentId);
id_newtype!(TeacherId);
id_newtype!(ClassId);
id_newtype!(SubjectId);
id_newtype!(AttendanceId);
id_newtype!(ResultId);
id_newtype!(FeeId);
id_newtype!(TimetableEntryId);
id_newtype!(AcademicYearId);
id_newtype!(TermId);
id_newtype!(ImportantDayId);
id_newtype!(UserId);
id_newtype!(ClassSubjectId);

/// Deserializes a field that distinguishes "absent" from "present but null",
/// so patches can clear an optional field. Pair with `#[serde(default)]`.
fn double_option<'de, T, D>(de: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Deserialize::deserialize(de).map(Some)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
}

/// Staff roles. `User` records extend this set with `Student`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StaffRole {
    Headteacher,
    Deputy,
    Classteacher,
    Subjectteacher,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Headteacher,
    Deputy,
    Classteacher,
    Subjectteacher,
    Student,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImportantDayKind {
    Holiday,
    Event,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DisciplineRecord {
    pub id: u32,
    pub term: String,
    pub rating: u8,
    pub notes: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GradeRecord {
    pub id: u32,
    pub grade: String,
    pub year: String,
    pub average_score: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Student {
    pub id: StudentId,
    pub name: String,
    pub grade: String,
    pub age: u32,
    pub email: String,
    pub class_id: ClassId,
    pub attendance: u32,
    pub fees_paid: bool,
    pub gender: Gender,
    pub emergency_contact: String,
    pub admission_date: NaiveDate,
    pub expected_leave_date: NaiveDate,
    pub discipline_records: Vec<DisciplineRecord>,
    pub grade_history: Vec<GradeRecord>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewStudent {
    pub name: String,
    pub grade: String,
    pub age: u32,
    pub email: String,
    pub class_id: ClassId,
    pub attendance: u32,
    pub fees_paid: bool,
    pub gender: Gender,
    pub emergency_contact: String,
    pub admission_date: NaiveDate,
    pub expected_leave_date: NaiveDate,
    #[serde(default)]
    pub discipline_records: Vec<DisciplineRecord>,
    #[serde(default)]
    pub grade_history: Vec<GradeRecord>,
}

impl NewStudent {
    pub fn into_record(self, id: StudentId) -> Student {
        Student {
            id,
            name: self.name,
            grade: self.grade,
            age: self.age,
            email: self.email,
            class_id: self.class_id,
            attendance: self.attendance,
            fees_paid: self.fees_paid,
            gender: self.gender,
            emergency_contact: self.emergency_contact,
            admission_date: self.admission_date,
            expected_leave_date: self.expected_leave_date,
            discipline_records: self.discipline_records,
            grade_history: self.grade_history,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentPatch {
    pub name: Option<String>,
    pub grade: Option<String>,
    pub age: Option<u32>,
    pub email: Option<String>,
    pub class_id: Option<ClassId>,
    pub attendance: Option<u32>,
    pub fees_paid: Option<bool>,
    pub gender: Option<Gender>,
    pub emergency_contact: Option<String>,
    pub admission_date: Option<NaiveDate>,
    pub expected_leave_date: Option<NaiveDate>,
    pub discipline_records: Option<Vec<DisciplineRecord>>,
    pub grade_history: Option<Vec<GradeRecord>>,
}

impl StudentPatch {
    pub fn apply(&self, s: &mut Student) {
        if let Some(v) = &self.name {
            s.name = v.clone();
        }
        if let Some(v) = &self.grade {
            s.grade = v.clone();
        }
        if let Some(v) = self.age {
            s.age = v;
        }
        if let Some(v) = &self.email {
            s.email = v.clone();
        }
        if let Some(v) = self.class_id {
            s.class_id = v;
        }
        if let Some(v) = self.attendance {
            s.attendance = v;
        }
        if let Some(v) = self.fees_paid {
            s.fees_paid = v;
        }
        if let Some(v) = self.gender {
            s.gender = v;
        }
        if let Some(v) = &self.emergency_contact {
            s.emergency_contact = v.clone();
        }
        if let Some(v) = self.admission_date {
            s.admission_date = v;
        }
        if let Some(v) = self.expected_leave_date {
            s.expected_leave_date = v;
        }
        if let Some(v) = &self.discipline_records {
            s.discipline_records = v.clone();
        }
        if let Some(v) = &self.grade_history {
            s.grade_history = v.clone();
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Teacher {
    pub id: TeacherId,
    pub name: String,
    pub subject: String,
    pub email: String,
    pub phone: String,
    pub role: StaffRole,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub class_id: Option<ClassId>,
    pub age: u32,
    pub gender: Gender,
    pub tsc_no: String,
    pub subject_combination: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTeacher {
    pub name: String,
    pub subject: String,
    pub email: String,
    pub phone: String,
    pub role: StaffRole,
    #[serde(default)]
    pub class_id: Option<ClassId>,
    pub age: u32,
    pub gender: Gender,
    pub tsc_no: String,
    pub subject_combination: String,
}

impl NewTeacher {
    pub fn into_record(self, id: TeacherId) -> Teacher {
        Teacher {
            id,
            name: self.name,
            subject: self.subject,
            email: self.email,
            phone: self.phone,
            role: self.role,
            class_id: self.class_id,
            age: self.age,
            gender: self.gender,
            tsc_no: self.tsc_no,
            subject_combination: self.subject_combination,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeacherPatch {
    pub name: Option<String>,
    pub subject: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub role: Option<StaffRole>,
    // classId: null clears the assignment; absent leaves it untouched.
    #[serde(default, deserialize_with = "double_option")]
    pub class_id: Option<Option<ClassId>>,
    pub age: Option<u32>,
    pub gender: Option<Gender>,
    pub tsc_no: Option<String>,
    pub subject_combination: Option<String>,
}

impl TeacherPatch {
    pub fn apply(&self, t: &mut Teacher) {
        if let Some(v) = &self.name {
            t.name = v.clone();
        }
        if let Some(v) = &self.subject {
            t.subject = v.clone();
        }
        if let Some(v) = &self.email {
            t.email = v.clone();
        }
        if let Some(v) = &self.phone {
            t.phone = v.clone();
        }
        if let Some(v) = self.role {
            t.role = v;
        }
        if let Some(v) = self.class_id {
            t.class_id = v;
        }
        if let Some(v) = self.age {
            t.age = v;
        }
        if let Some(v) = self.gender {
            t.gender = v;
        }
        if let Some(v) = &self.tsc_no {
            t.tsc_no = v.clone();
        }
        if let Some(v) = &self.subject_combination {
            t.subject_combination = v.clone();
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Class {
    pub id: ClassId,
    pub name: String,
    pub teacher_id: TeacherId,
    pub student_ids: Vec<StudentId>,
    pub class_rep: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewClass {
    pub name: String,
    pub teacher_id: TeacherId,
    #[serde(default)]
    pub student_ids: Vec<StudentId>,
    pub class_rep: String,
}

impl NewClass {
    pub fn into_record(self, id: ClassId) -> Class {
        Class {
            id,
            name: self.name,
            teacher_id: self.teacher_id,
            student_ids: self.student_ids,
            class_rep: self.class_rep,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassPatch {
    pub name: Option<String>,
    pub teacher_id: Option<TeacherId>,
    pub student_ids: Option<Vec<StudentId>>,
    pub class_rep: Option<String>,
}

impl ClassPatch {
    pub fn apply(&self, c: &mut Class) {
        if let Some(v) = &self.name {
            c.name = v.clone();
        }
        if let Some(v) = self.teacher_id {
            c.teacher_id = v;
        }
        if let Some(v) = &self.student_ids {
            c.student_ids = v.clone();
        }
        if let Some(v) = &self.class_rep {
            c.class_rep = v.clone();
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subject {
    pub id: SubjectId,
    pub name: String,
    pub teacher_id: TeacherId,
    pub class_ids: Vec<ClassId>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewSubject {
    pub name: String,
    pub teacher_id: TeacherId,
    #[serde(default)]
    pub class_ids: Vec<ClassId>,
}

impl NewSubject {
    pub fn into_record(self, id: SubjectId) -> Subject {
        Subject {
            id,
            name: self.name,
            teacher_id: self.teacher_id,
            class_ids: self.class_ids,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubjectPatch {
    pub name: Option<String>,
    pub teacher_id: Option<TeacherId>,
    pub class_ids: Option<Vec<ClassId>>,
}

impl SubjectPatch {
    pub fn apply(&self, s: &mut Subject) {
        if let Some(v) = &self.name {
            s.name = v.clone();
        }
        if let Some(v) = self.teacher_id {
            s.teacher_id = v;
        }
        if let Some(v) = &self.class_ids {
            s.class_ids = v.clone();
        }
    }
}

/// One attendance mark for one student on one calendar day. Nothing enforces
/// uniqueness of (student, date); duplicate-day records are representable and
/// readers tolerate them.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attendance {
    pub id: AttendanceId,
    pub student_id: StudentId,
    pub date: NaiveDate,
    pub present: bool,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewAttendance {
    pub student_id: StudentId,
    pub date: NaiveDate,
    pub present: bool,
}

impl NewAttendance {
    pub fn into_record(self, id: AttendanceId) -> Attendance {
        Attendance {
            id,
            student_id: self.student_id,
            date: self.date,
            present: self.present,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendancePatch {
    pub student_id: Option<StudentId>,
    pub date: Option<NaiveDate>,
    pub present: Option<bool>,
}

impl AttendancePatch {
    pub fn apply(&self, a: &mut Attendance) {
        if let Some(v) = self.student_id {
            a.student_id = v;
        }
        if let Some(v) = self.date {
            a.date = v;
        }
        if let Some(v) = self.present {
            a.present = v;
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExamResult {
    pub id: ResultId,
    pub student_id: StudentId,
    pub subject_id: SubjectId,
    pub score: f64,
    pub grade: String,
    pub term: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewExamResult {
    pub student_id: StudentId,
    pub subject_id: SubjectId,
    pub score: f64,
    pub grade: String,
    pub term: String,
}

impl NewExamResult {
    pub fn into_record(self, id: ResultId) -> ExamResult {
        ExamResult {
            id,
            student_id: self.student_id,
            subject_id: self.subject_id,
            score: self.score,
            grade: self.grade,
            term: self.term,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExamResultPatch {
    pub student_id: Option<StudentId>,
    pub subject_id: Option<SubjectId>,
    pub score: Option<f64>,
    pub grade: Option<String>,
    pub term: Option<String>,
}

impl ExamResultPatch {
    pub fn apply(&self, r: &mut ExamResult) {
        if let Some(v) = self.student_id {
            r.student_id = v;
        }
        if let Some(v) = self.subject_id {
            r.subject_id = v;
        }
        if let Some(v) = self.score {
            r.score = v;
        }
        if let Some(v) = &self.grade {
            r.grade = v.clone();
        }
        if let Some(v) = &self.term {
            r.term = v.clone();
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Fee {
    pub id: FeeId,
    pub student_id: StudentId,
    pub amount: f64,
    pub due_date: NaiveDate,
    pub paid: bool,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewFee {
    pub student_id: StudentId,
    pub amount: f64,
    pub due_date: NaiveDate,
    pub paid: bool,
}

impl NewFee {
    pub fn into_record(self, id: FeeId) -> Fee {
        Fee {
            id,
            student_id: self.student_id,
            amount: self.amount,
            due_date: self.due_date,
            paid: self.paid,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeePatch {
    pub student_id: Option<StudentId>,
    pub amount: Option<f64>,
    pub due_date: Option<NaiveDate>,
    pub paid: Option<bool>,
}

impl FeePatch {
    pub fn apply(&self, f: &mut Fee) {
        if let Some(v) = self.student_id {
            f.student_id = v;
        }
        if let Some(v) = self.amount {
            f.amount = v;
        }
        if let Some(v) = self.due_date {
            f.due_date = v;
        }
        if let Some(v) = self.paid {
            f.paid = v;
        }
    }
}

// Start/end times stay display strings ("08:00"); only dates get calendar
// typing.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimetableEntry {
    pub id: TimetableEntryId,
    pub day: String,
    pub start_time: String,
    pub end_time: String,
    pub subject_id: SubjectId,
    pub teacher_id: TeacherId,
    pub class_id: ClassId,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTimetableEntry {
    pub day: String,
    pub start_time: String,
    pub end_time: String,
    pub subject_id: SubjectId,
    pub teacher_id: TeacherId,
    pub class_id: ClassId,
}

impl NewTimetableEntry {
    pub fn into_record(self, id: TimetableEntryId) -> TimetableEntry {
        TimetableEntry {
            id,
            day: self.day,
            start_time: self.start_time,
            end_time: self.end_time,
            subject_id: self.subject_id,
            teacher_id: self.teacher_id,
            class_id: self.class_id,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimetableEntryPatch {
    pub day: Option<String>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub subject_id: Option<SubjectId>,
    pub teacher_id: Option<TeacherId>,
    pub class_id: Option<ClassId>,
}

impl TimetableEntryPatch {
    pub fn apply(&self, e: &mut TimetableEntry) {
        if let Some(v) = &self.day {
            e.day = v.clone();
        }
        if let Some(v) = &self.start_time {
            e.start_time = v.clone();
        }
        if let Some(v) = &self.end_time {
            e.end_time = v.clone();
        }
        if let Some(v) = self.subject_id {
            e.subject_id = v;
        }
        if let Some(v) = self.teacher_id {
            e.teacher_id = v;
        }
        if let Some(v) = self.class_id {
            e.class_id = v;
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AcademicYear {
    pub id: AcademicYearId,
    pub name: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

/// Input for the academic-year singleton. An omitted id keeps the current
/// singleton's id, defaulting to 1.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AcademicYearInput {
    #[serde(default)]
    pub id: Option<AcademicYearId>,
    pub name: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Term {
    pub id: TermId,
    pub name: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub academic_year_id: AcademicYearId,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTerm {
    pub name: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub academic_year_id: AcademicYearId,
}

impl NewTerm {
    pub fn into_record(self, id: TermId) -> Term {
        Term {
            id,
            name: self.name,
            start_date: self.start_date,
            end_date: self.end_date,
            academic_year_id: self.academic_year_id,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TermPatch {
    pub name: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub academic_year_id: Option<AcademicYearId>,
}

impl TermPatch {
    pub fn apply(&self, t: &mut Term) {
        if let Some(v) = &self.name {
            t.name = v.clone();
        }
        if let Some(v) = self.start_date {
            t.start_date = v;
        }
        if let Some(v) = self.end_date {
            t.end_date = v;
        }
        if let Some(v) = self.academic_year_id {
            t.academic_year_id = v;
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportantDay {
    pub id: ImportantDayId,
    pub name: String,
    pub date: NaiveDate,
    #[serde(rename = "type")]
    pub kind: ImportantDayKind,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewImportantDay {
    pub name: String,
    pub date: NaiveDate,
    #[serde(rename = "type")]
    pub kind: ImportantDayKind,
}

impl NewImportantDay {
    pub fn into_record(self, id: ImportantDayId) -> ImportantDay {
        ImportantDay {
            id,
            name: self.name,
            date: self.date,
            kind: self.kind,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportantDayPatch {
    pub name: Option<String>,
    pub date: Option<NaiveDate>,
    #[serde(rename = "type")]
    pub kind: Option<ImportantDayKind>,
}

impl ImportantDayPatch {
    pub fn apply(&self, d: &mut ImportantDay) {
        if let Some(v) = &self.name {
            d.name = v.clone();
        }
        if let Some(v) = self.date {
            d.date = v;
        }
        if let Some(v) = self.kind {
            d.kind = v;
        }
    }
}

/// Login identity. `entity_id` is the raw id of the matching Student or
/// Teacher record, selected by role.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub role: Role,
    pub username: String,
    pub password: String,
    pub entity_id: u32,
}

/// Join row between a class, a subject and (optionally) the teacher taking
/// it. Managed by wholesale replacement; callers compute the next collection
/// themselves, ids included.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassSubject {
    pub id: ClassSubjectId,
    pub class_id: ClassId,
    pub subject_id: SubjectId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub teacher_id: Option<TeacherId>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn teacher_patch_distinguishes_absent_from_null_class() {
        let absent: TeacherPatch = serde_json::from_value(serde_json::json!({
            "name": "Mr. New Name"
        }))
        .expect("parse patch");
        assert!(absent.class_id.is_none());

        let cleared: TeacherPatch = serde_json::from_value(serde_json::json!({
            "classId": null
        }))
        .expect("parse patch");
        assert_eq!(cleared.class_id, Some(None));

        let assigned: TeacherPatch = serde_json::from_value(serde_json::json!({
            "classId": 2
        }))
        .expect("parse patch");
        assert_eq!(assigned.class_id, Some(Some(ClassId(2))));
    }

    #[test]
    fn patch_apply_overwrites_only_present_fields() {
        let mut result = ExamResult {
            id: ResultId(1),
            student_id: StudentId(1),
            subject_id: SubjectId(1),
            score: 85.0,
            grade: "A".to_string(),
            term: "Term 1".to_string(),
        };
        let patch = ExamResultPatch {
            score: Some(95.0),
            ..Default::default()
        };
        patch.apply(&mut result);
        assert_eq!(result.score, 95.0);
        assert_eq!(result.grade, "A");
        assert_eq!(result.term, "Term 1");
        assert_eq!(result.student_id, StudentId(1));
    }

    #[test]
    fn important_day_kind_round_trips_as_type() {
        let day = ImportantDay {
            id: ImportantDayId(1),
            name: "Sports Day".to_string(),
            date: NaiveDate::from_ymd_opt(2024, 6, 1).expect("date"),
            kind: ImportantDayKind::Event,
        };
        let v = serde_json::to_value(&day).expect("serialize");
        assert_eq!(v.get("type").and_then(|t| t.as_str()), Some("event"));
    }
}
