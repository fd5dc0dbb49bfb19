//! Role dashboards and the deputy overview reports. Every payload is a pure
//! function of the current store snapshot, recomputed per request.
//!
//! Rounding and rating bands are intentionally per-screen: the attendance
//! overview rates Excellent from 95%, the results screens from 90 or 85,
//! and some screens round to an integer where others keep one decimal.
//! One-decimal figures are emitted as strings ("81.5"); integer-rounded
//! figures stay numbers.

use chrono::NaiveDate;
use serde_json::json;

use crate::ipc::error::{err, ok};
use crate::ipc::handlers::{required_u32, store_or_err};
use crate::ipc::types::{AppState, Request};
use crate::model::{ClassId, Student, StudentId, SubjectId, TeacherId};
use crate::stats::{fmt_1dp, mean, rate_percent, round_int};
use crate::store::Store;

fn scores_for_student(store: &Store, student_id: StudentId) -> Vec<f64> {
    store
        .results()
        .iter()
        .filter(|r| r.student_id == student_id)
        .map(|r| r.score)
        .collect()
}

fn attendance_rate_for_student(store: &Store, student_id: StudentId) -> (usize, usize) {
    let records: Vec<_> = store
        .attendance()
        .iter()
        .filter(|a| a.student_id == student_id)
        .collect();
    let present = records.iter().filter(|a| a.present).count();
    (present, records.len())
}

fn handle_overview(state: &mut AppState, req: &Request) -> serde_json::Value {
    let store = match store_or_err(state, req) {
        Ok(s) => s,
        Err(resp) => return resp,
    };
    let store = &*store;
    let recent: Vec<&Student> = store.students().iter().take(5).collect();
    let recent = match serde_json::to_value(recent) {
        Ok(v) => v,
        Err(e) => return err(&req.id, "encode_failed", e.to_string(), None),
    };
    ok(
        &req.id,
        json!({
            "totalClasses": store.classes().len(),
            "totalStudents": store.students().len(),
            "totalTeachers": store.teachers().len(),
            "recentStudents": recent
        }),
    )
}

fn handle_headteacher(state: &mut AppState, req: &Request) -> serde_json::Value {
    let store = match store_or_err(state, req) {
        Ok(s) => s,
        Err(resp) => return resp,
    };
    let store = &*store;
    let present = store.attendance().iter().filter(|a| a.present).count();
    let attendance_rate = if store.attendance().is_empty() {
        json!(0)
    } else {
        json!(fmt_1dp(rate_percent(present, store.attendance().len())))
    };
    let fees_total: f64 = store.fees().iter().map(|f| f.amount).sum();
    let fees_collected: f64 = store
        .fees()
        .iter()
        .filter(|f| f.paid)
        .map(|f| f.amount)
        .sum();

    let results: Vec<serde_json::Value> = store
        .results()
        .iter()
        .map(|r| {
            let student_name = store
                .student(r.student_id)
                .map(|s| s.name.as_str())
                .unwrap_or("Unknown");
            let subject_name = store
                .subject(r.subject_id)
                .map(|s| s.name.as_str())
                .unwrap_or("Unknown");
            json!({
                "resultId": r.id,
                "studentName": student_name,
                "subjectName": subject_name,
                "score": r.score,
                "grade": r.grade,
                "term": r.term
            })
        })
        .collect();

    ok(
        &req.id,
        json!({
            "totalStudents": store.students().len(),
            "totalTeachers": store.teachers().len(),
            "totalClasses": store.classes().len(),
            "totalSubjects": store.subjects().len(),
            "attendanceRate": attendance_rate,
            "feesCollected": fees_collected,
            "feesBalance": fees_total - fees_collected,
            "results": results
        }),
    )
}

fn handle_deputy(state: &mut AppState, req: &Request) -> serde_json::Value {
    let store = match store_or_err(state, req) {
        Ok(s) => s,
        Err(resp) => return resp,
    };
    let store = &*store;
    let present = store.attendance().iter().filter(|a| a.present).count();
    let outstanding: f64 = store
        .fees()
        .iter()
        .filter(|f| !f.paid)
        .map(|f| f.amount)
        .sum();
    let scores: Vec<f64> = store.results().iter().map(|r| r.score).collect();
    ok(
        &req.id,
        json!({
            "totalStudents": store.students().len(),
            "todaysAttendance": round_int(rate_percent(present, store.attendance().len())),
            "outstandingFees": outstanding,
            "averageScore": round_int(mean(&scores))
        }),
    )
}

fn handle_class_teacher(state: &mut AppState, req: &Request) -> serde_json::Value {
    let teacher_id = match required_u32(&req.params, "teacherId") {
        Ok(v) => v,
        Err(msg) => return err(&req.id, "bad_params", msg, None),
    };
    let date: NaiveDate = match req
        .params
        .get("date")
        .map(|v| serde_json::from_value(v.clone()))
    {
        Some(Ok(d)) => d,
        _ => return err(&req.id, "bad_params", "missing or invalid date", None),
    };
    let store = match store_or_err(state, req) {
        Ok(s) => s,
        Err(resp) => return resp,
    };
    let store = &*store;

    let Some(class) = store.class_of_teacher(TeacherId(teacher_id)) else {
        return ok(&req.id, json!({ "class": null }));
    };
    let class_json = match serde_json::to_value(class) {
        Ok(v) => v,
        Err(e) => return err(&req.id, "encode_failed", e.to_string(), None),
    };
    let class_students: Vec<&Student> = class
        .student_ids
        .iter()
        .filter_map(|&id| store.student(id))
        .collect();

    let class_scores: Vec<f64> = store
        .results()
        .iter()
        .filter(|r| class_students.iter().any(|s| s.id == r.student_id))
        .map(|r| r.score)
        .collect();
    let class_average = if class_students.is_empty() {
        "0".to_string()
    } else {
        fmt_1dp(mean(&class_scores))
    };

    let attendance_rows: Vec<serde_json::Value> = class_students
        .iter()
        .map(|s| {
            // First record wins when a day was marked twice.
            let status = store
                .attendance()
                .iter()
                .find(|a| a.student_id == s.id && a.date == date)
                .map(|a| if a.present { "present" } else { "absent" })
                .unwrap_or("not_marked");
            json!({
                "studentId": s.id,
                "name": s.name,
                "grade": s.grade,
                "status": status
            })
        })
        .collect();

    let performance: Vec<serde_json::Value> = class_students
        .iter()
        .map(|s| {
            let scores = scores_for_student(store, s.id);
            let average_score = if scores.is_empty() {
                "0".to_string()
            } else {
                fmt_1dp(mean(&scores))
            };
            let (present, total) = attendance_rate_for_student(store, s.id);
            let attendance_rate = if total == 0 {
                "0".to_string()
            } else {
                fmt_1dp(rate_percent(present, total))
            };
            json!({
                "studentId": s.id,
                "name": s.name,
                "averageScore": average_score,
                "attendanceRate": attendance_rate
            })
        })
        .collect();

    ok(
        &req.id,
        json!({
            "class": class_json,
            "totalStudents": class_students.len(),
            "classAverage": class_average,
            "attendance": attendance_rows,
            "performance": performance
        }),
    )
}

fn handle_subject_teacher(state: &mut AppState, req: &Request) -> serde_json::Value {
    let subject_id = match required_u32(&req.params, "subjectId") {
        Ok(v) => v,
        Err(msg) => return err(&req.id, "bad_params", msg, None),
    };
    let store = match store_or_err(state, req) {
        Ok(s) => s,
        Err(resp) => return resp,
    };
    let store = &*store;
    let subject = store.subject(SubjectId(subject_id));
    let subject_name = subject.map(|s| s.name.as_str()).unwrap_or("N/A");
    let class_ids: Vec<ClassId> = subject.map(|s| s.class_ids.clone()).unwrap_or_default();
    let students_teaching = store
        .students()
        .iter()
        .filter(|s| class_ids.contains(&s.class_id))
        .count();
    let scores: Vec<f64> = store
        .results()
        .iter()
        .filter(|r| r.subject_id == SubjectId(subject_id))
        .map(|r| r.score)
        .collect();
    ok(
        &req.id,
        json!({
            "subjectName": subject_name,
            "studentsTeaching": students_teaching,
            "averageScore": round_int(mean(&scores)),
            "classes": class_ids.len()
        }),
    )
}

fn handle_student(state: &mut AppState, req: &Request) -> serde_json::Value {
    let student_id = match required_u32(&req.params, "studentId") {
        Ok(v) => v,
        Err(msg) => return err(&req.id, "bad_params", msg, None),
    };
    let store = match store_or_err(state, req) {
        Ok(s) => s,
        Err(resp) => return resp,
    };
    let store = &*store;
    let Some(student) = store.student(StudentId(student_id)) else {
        return err(&req.id, "not_found", "student not found", None);
    };

    let scores = scores_for_student(store, student.id);
    let average = mean(&scores);
    let trend = if average > 80.0 {
        "up"
    } else if average > 60.0 {
        "stable"
    } else {
        "down"
    };

    let score_rows: Vec<serde_json::Value> = store
        .results()
        .iter()
        .filter(|r| r.student_id == student.id)
        .map(|r| {
            let subject_name = store
                .subject(r.subject_id)
                .map(|s| s.name.as_str())
                .unwrap_or("Unknown");
            let performance = if r.score >= 90.0 {
                "Excellent"
            } else if r.score >= 80.0 {
                "Good"
            } else if r.score >= 70.0 {
                "Satisfactory"
            } else {
                "Needs Improvement"
            };
            json!({
                "resultId": r.id,
                "subjectName": subject_name,
                "score": r.score,
                "grade": r.grade,
                "term": r.term,
                "performance": performance
            })
        })
        .collect();

    let report_grade = if average >= 90.0 {
        "A"
    } else if average >= 80.0 {
        "B"
    } else if average >= 70.0 {
        "C"
    } else {
        "D"
    };
    let report_comments = if average >= 90.0 {
        "Outstanding performance. Keep it up!"
    } else if average >= 80.0 {
        "Good work. Room for improvement."
    } else if average >= 70.0 {
        "Satisfactory. Needs more effort."
    } else {
        "Requires significant improvement and attention."
    };

    let student_fees: Vec<_> = store
        .fees()
        .iter()
        .filter(|f| f.student_id == student.id)
        .collect();
    let total_fees: f64 = student_fees.iter().map(|f| f.amount).sum();
    let paid_fees: f64 = student_fees
        .iter()
        .filter(|f| f.paid)
        .map(|f| f.amount)
        .sum();
    let fee_rows: Vec<serde_json::Value> = student_fees
        .iter()
        .map(|f| {
            json!({
                "feeId": f.id,
                "amount": f.amount,
                "dueDate": f.due_date,
                "paid": f.paid
            })
        })
        .collect();

    ok(
        &req.id,
        json!({
            "name": student.name,
            "grade": student.grade,
            "averageScore": fmt_1dp(average),
            "scoreTrend": trend,
            "scores": score_rows,
            "reportCard": {
                "term": "Term 1",
                "averageScore": fmt_1dp(average),
                "grade": report_grade,
                "comments": report_comments
            },
            "fees": fee_rows,
            "totalFees": total_fees,
            "paidFees": paid_fees,
            "balance": total_fees - paid_fees
        }),
    )
}

fn handle_attendance_overview(state: &mut AppState, req: &Request) -> serde_json::Value {
    let store = match store_or_err(state, req) {
        Ok(s) => s,
        Err(resp) => return resp,
    };
    let store = &*store;

    struct Row<'a> {
        student: &'a Student,
        present_days: usize,
        total_days: usize,
        percentage: i64,
        rating: &'static str,
    }

    let mut rows: Vec<Row> = store
        .students()
        .iter()
        .map(|s| {
            let (present_days, total_days) = attendance_rate_for_student(store, s.id);
            let percentage = round_int(rate_percent(present_days, total_days));
            let rating = if percentage >= 95 {
                "Excellent"
            } else if percentage >= 85 {
                "Good"
            } else if percentage >= 75 {
                "Average"
            } else {
                "Poor"
            };
            Row {
                student: s,
                present_days,
                total_days,
                percentage,
                rating,
            }
        })
        .collect();

    let count_of = |rows: &[Row], rating: &str| rows.iter().filter(|r| r.rating == rating).count();
    let excellent = count_of(&rows, "Excellent");
    let good = count_of(&rows, "Good");
    let average = count_of(&rows, "Average");
    let poor = count_of(&rows, "Poor");
    let percentages: Vec<f64> = rows.iter().map(|r| r.percentage as f64).collect();

    // Best first; ties stay in student order (the sort is stable and no
    // tie-break rule exists).
    rows.sort_by(|a, b| b.percentage.cmp(&a.percentage));
    let rankings: Vec<serde_json::Value> = rows
        .iter()
        .enumerate()
        .map(|(idx, r)| {
            json!({
                "rank": idx + 1,
                "studentId": r.student.id,
                "name": r.student.name,
                "grade": r.student.grade,
                "presentDays": r.present_days,
                "totalDays": r.total_days,
                "percentage": r.percentage,
                "rating": r.rating
            })
        })
        .collect();

    ok(
        &req.id,
        json!({
            "totalStudents": store.students().len(),
            "excellent": excellent,
            "good": good,
            "average": average,
            "poor": poor,
            "averagePercentage": round_int(mean(&percentages)),
            "rankings": rankings
        }),
    )
}

fn handle_results_overview(state: &mut AppState, req: &Request) -> serde_json::Value {
    let store = match store_or_err(state, req) {
        Ok(s) => s,
        Err(resp) => return resp,
    };
    let store = &*store;
    let total_results = store.results().len();
    let all_scores: Vec<f64> = store.results().iter().map(|r| r.score).collect();
    let overall_average = if total_results == 0 {
        "0".to_string()
    } else {
        fmt_1dp(mean(&all_scores))
    };

    let band_count = |lo: Option<f64>, hi: Option<f64>| {
        store
            .results()
            .iter()
            .filter(|r| lo.map_or(true, |v| r.score >= v) && hi.map_or(true, |v| r.score < v))
            .count()
    };
    let share = |count: usize| {
        if total_results == 0 {
            json!(0)
        } else {
            json!(fmt_1dp(rate_percent(count, total_results)))
        }
    };
    let excellent = band_count(Some(90.0), None);
    let good = band_count(Some(80.0), Some(90.0));
    let average = band_count(Some(70.0), Some(80.0));
    let poor = band_count(None, Some(70.0));

    let level_for = |avg: f64| {
        if avg >= 85.0 {
            "Excellent"
        } else if avg >= 75.0 {
            "Good"
        } else if avg >= 65.0 {
            "Average"
        } else {
            "Poor"
        }
    };

    let subject_performance: Vec<serde_json::Value> = store
        .subjects()
        .iter()
        .map(|subject| {
            let scores: Vec<f64> = store
                .results()
                .iter()
                .filter(|r| r.subject_id == subject.id)
                .map(|r| r.score)
                .collect();
            let avg = mean(&scores);
            json!({
                "subjectId": subject.id,
                "name": subject.name,
                "studentCount": scores.len(),
                "averageScore": fmt_1dp(avg),
                "level": level_for(avg)
            })
        })
        .collect();

    let class_performance: Vec<serde_json::Value> = store
        .classes()
        .iter()
        .map(|class| {
            let scores: Vec<f64> = store
                .results()
                .iter()
                .filter(|r| class.student_ids.contains(&r.student_id))
                .map(|r| r.score)
                .collect();
            let avg = mean(&scores);
            let class_rep = if class.class_rep.is_empty() {
                "Not assigned"
            } else {
                class.class_rep.as_str()
            };
            json!({
                "classId": class.id,
                "name": class.name,
                "classRep": class_rep,
                "studentCount": class.student_ids.len(),
                "averageScore": fmt_1dp(avg),
                "level": level_for(avg)
            })
        })
        .collect();

    ok(
        &req.id,
        json!({
            "totalResults": total_results,
            "totalStudents": store.students().len(),
            "totalSubjects": store.subjects().len(),
            "overallAverage": overall_average,
            "distribution": {
                "excellent": { "count": excellent, "share": share(excellent) },
                "good": { "count": good, "share": share(good) },
                "average": { "count": average, "share": share(average) },
                "poor": { "count": poor, "share": share(poor) }
            },
            "subjectPerformance": subject_performance,
            "classPerformance": class_performance
        }),
    )
}

fn handle_students_overview(state: &mut AppState, req: &Request) -> serde_json::Value {
    let store = match store_or_err(state, req) {
        Ok(s) => s,
        Err(resp) => return resp,
    };
    let store = &*store;
    let total_students = store.students().len();
    let all_scores: Vec<f64> = store.results().iter().map(|r| r.score).collect();
    let average_score = if all_scores.is_empty() {
        "0".to_string()
    } else {
        fmt_1dp(mean(&all_scores))
    };
    let present = store.attendance().iter().filter(|a| a.present).count();
    let attendance_rate = if store.attendance().is_empty() {
        "0".to_string()
    } else {
        fmt_1dp(rate_percent(present, store.attendance().len()))
    };

    let grades: Vec<&str> = store
        .students()
        .iter()
        .map(|s| s.grade.as_str())
        .collect::<std::collections::BTreeSet<_>>()
        .into_iter()
        .collect();
    let by_grade: Vec<serde_json::Value> = grades
        .iter()
        .map(|grade| {
            let count = store
                .students()
                .iter()
                .filter(|s| s.grade == *grade)
                .count();
            json!({
                "grade": grade,
                "count": count,
                "share": fmt_1dp(rate_percent(count, total_students))
            })
        })
        .collect();

    struct Perf<'a> {
        student: &'a Student,
        average: f64,
        attendance_rate: f64,
    }
    let mut performance: Vec<Perf> = store
        .students()
        .iter()
        .map(|s| {
            let scores = scores_for_student(store, s.id);
            let (present, total) = attendance_rate_for_student(store, s.id);
            Perf {
                student: s,
                average: mean(&scores),
                attendance_rate: rate_percent(present, total),
            }
        })
        .collect();
    performance.sort_by(|a, b| {
        b.average
            .partial_cmp(&a.average)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    let top_performers: Vec<serde_json::Value> = performance
        .iter()
        .take(10)
        .enumerate()
        .map(|(idx, p)| {
            let level = if p.average >= 90.0 {
                "Excellent"
            } else if p.average >= 80.0 {
                "Good"
            } else if p.average >= 70.0 {
                "Average"
            } else {
                "Needs Attention"
            };
            json!({
                "rank": idx + 1,
                "studentId": p.student.id,
                "name": p.student.name,
                "grade": p.student.grade,
                "averageScore": fmt_1dp(p.average),
                "attendanceRate": fmt_1dp(p.attendance_rate),
                "level": level
            })
        })
        .collect();

    ok(
        &req.id,
        json!({
            "totalStudents": total_students,
            "totalClasses": store.classes().len(),
            "averageScore": average_score,
            "attendanceRate": attendance_rate,
            "byGrade": by_grade,
            "topPerformers": top_performers
        }),
    )
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "dashboard.overview" => Some(handle_overview(state, req)),
        "dashboard.headteacher" => Some(handle_headteacher(state, req)),
        "dashboard.deputy" => Some(handle_deputy(state, req)),
        "dashboard.classTeacher" => Some(handle_class_teacher(state, req)),
        "dashboard.subjectTeacher" => Some(handle_subject_teacher(state, req)),
        "dashboard.student" => Some(handle_student(state, req)),
        "reports.attendanceOverview" => Some(handle_attendance_overview(state, req)),
        "reports.resultsOverview" => Some(handle_results_overview(state, req)),
        "reports.studentsOverview" => Some(handle_students_overview(state, req)),
        _ => None,
    }
}
