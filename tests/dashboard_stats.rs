use serde_json::json;
use std::io::{BufRead, BufReader, Write};
use std::process::{Child, ChildStdin, ChildStdout, Command, Stdio};

fn spawn_sidecar() -> (Child, ChildStdin, BufReader<ChildStdout>) {
    let exe = env!("CARGO_BIN_EXE_schoold");
    let mut child = Command::new(exe)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .spawn()
        .expect("spawn schoold");
    let stdin = child.stdin.take().expect("child stdin");
    let stdout = child.stdout.take().expect("child stdout");
    (child, stdin, BufReader::new(stdout))
}

fn request(
    stdin: &mut ChildStdin,
    reader: &mut BufReader<ChildStdout>,
    id: &str,
    method: &str,
    params: serde_json::Value,
) -> serde_json::Value {
    let payload = json!({
        "id": id,
        "method": method,
        "params": params,
    });
    writeln!(stdin, "{}", payload).expect("write request");
    stdin.flush().expect("flush request");

    let mut line = String::new();
    reader.read_line(&mut line).expect("read response line");
    serde_json::from_str(line.trim()).expect("parse response json")
}

fn result(value: &serde_json::Value) -> &serde_json::Value {
    assert_eq!(
        value.get("ok").and_then(|v| v.as_bool()),
        Some(true),
        "expected ok response, got {}",
        value
    );
    value.get("result").expect("result")
}

fn str_of<'a>(value: &'a serde_json::Value, key: &str) -> &'a str {
    value
        .get(key)
        .and_then(|v| v.as_str())
        .unwrap_or_else(|| panic!("missing string {}: {}", key, value))
}

fn u64_of(value: &serde_json::Value, key: &str) -> u64 {
    value
        .get(key)
        .and_then(|v| v.as_u64())
        .unwrap_or_else(|| panic!("missing number {}: {}", key, value))
}

#[test]
fn overview_counts_the_seeded_collections() {
    let (mut child, mut stdin, mut reader) = spawn_sidecar();
    let _ = request(&mut stdin, &mut reader, "1", "session.open", json!({}));

    let resp = request(&mut stdin, &mut reader, "2", "dashboard.overview", json!({}));
    let body = result(&resp);
    assert_eq!(u64_of(body, "totalClasses"), 2);
    assert_eq!(u64_of(body, "totalStudents"), 10);
    assert_eq!(u64_of(body, "totalTeachers"), 5);
    let recent = body
        .get("recentStudents")
        .and_then(|v| v.as_array())
        .expect("recentStudents");
    assert_eq!(recent.len(), 5);
    assert_eq!(str_of(&recent[0], "name"), "Alice Johnson");

    drop(stdin);
    let _ = child.wait();
}

#[test]
fn headteacher_dashboard_reports_rates_and_fee_totals() {
    let (mut child, mut stdin, mut reader) = spawn_sidecar();
    let _ = request(&mut stdin, &mut reader, "1", "session.open", json!({}));

    let resp = request(
        &mut stdin,
        &mut reader,
        "2",
        "dashboard.headteacher",
        json!({}),
    );
    let body = result(&resp);
    // Two of three seeded marks are present.
    assert_eq!(str_of(body, "attendanceRate"), "66.7");
    assert_eq!(
        body.get("feesCollected").and_then(|v| v.as_f64()),
        Some(500.0)
    );
    assert_eq!(
        body.get("feesBalance").and_then(|v| v.as_f64()),
        Some(500.0)
    );
    let rows = body
        .get("results")
        .and_then(|v| v.as_array())
        .expect("results rows");
    assert_eq!(rows.len(), 2);
    assert_eq!(str_of(&rows[0], "studentName"), "Alice Johnson");
    assert_eq!(str_of(&rows[0], "subjectName"), "Mathematics");

    drop(stdin);
    let _ = child.wait();
}

#[test]
fn deputy_dashboard_rounds_to_whole_numbers() {
    let (mut child, mut stdin, mut reader) = spawn_sidecar();
    let _ = request(&mut stdin, &mut reader, "1", "session.open", json!({}));

    let resp = request(&mut stdin, &mut reader, "2", "dashboard.deputy", json!({}));
    let body = result(&resp);
    assert_eq!(u64_of(body, "totalStudents"), 10);
    assert_eq!(u64_of(body, "todaysAttendance"), 67);
    assert_eq!(
        body.get("outstandingFees").and_then(|v| v.as_f64()),
        Some(500.0)
    );
    // Mean of 85 and 78 is 81.5, rounded away from zero.
    assert_eq!(u64_of(body, "averageScore"), 82);

    drop(stdin);
    let _ = child.wait();
}

#[test]
fn class_teacher_dashboard_covers_roster_attendance_and_averages() {
    let (mut child, mut stdin, mut reader) = spawn_sidecar();
    let _ = request(&mut stdin, &mut reader, "1", "session.open", json!({}));

    let resp = request(
        &mut stdin,
        &mut reader,
        "2",
        "dashboard.classTeacher",
        json!({ "teacherId": 3, "date": "2024-01-15" }),
    );
    let body = result(&resp);
    assert_eq!(
        body.get("class")
            .and_then(|c| c.get("name"))
            .and_then(|v| v.as_str()),
        Some("Grade 5A")
    );
    assert_eq!(u64_of(body, "totalStudents"), 3);
    assert_eq!(str_of(body, "classAverage"), "85.0");

    let attendance = body
        .get("attendance")
        .and_then(|v| v.as_array())
        .expect("attendance rows");
    let status_of = |id: u64| {
        attendance
            .iter()
            .find(|r| u64_of(r, "studentId") == id)
            .map(|r| str_of(r, "status").to_string())
            .expect("attendance row")
    };
    assert_eq!(status_of(1), "present");
    assert_eq!(status_of(3), "present");
    assert_eq!(status_of(5), "not_marked");

    let performance = body
        .get("performance")
        .and_then(|v| v.as_array())
        .expect("performance rows");
    let alice = performance
        .iter()
        .find(|r| u64_of(r, "studentId") == 1)
        .expect("alice row");
    assert_eq!(str_of(alice, "averageScore"), "85.0");
    assert_eq!(str_of(alice, "attendanceRate"), "100.0");
    let eve = performance
        .iter()
        .find(|r| u64_of(r, "studentId") == 5)
        .expect("eve row");
    // No marks and no results at all renders as a bare zero.
    assert_eq!(str_of(eve, "averageScore"), "0");
    assert_eq!(str_of(eve, "attendanceRate"), "0");

    // A teacher without a class gets a null class instead of an error.
    let resp = request(
        &mut stdin,
        &mut reader,
        "3",
        "dashboard.classTeacher",
        json!({ "teacherId": 1, "date": "2024-01-15" }),
    );
    assert!(result(&resp)
        .get("class")
        .map(|v| v.is_null())
        .unwrap_or(false));

    drop(stdin);
    let _ = child.wait();
}

#[test]
fn subject_teacher_dashboard_counts_students_across_classes() {
    let (mut child, mut stdin, mut reader) = spawn_sidecar();
    let _ = request(&mut stdin, &mut reader, "1", "session.open", json!({}));

    let resp = request(
        &mut stdin,
        &mut reader,
        "2",
        "dashboard.subjectTeacher",
        json!({ "subjectId": 1 }),
    );
    let body = result(&resp);
    assert_eq!(str_of(body, "subjectName"), "Mathematics");
    assert_eq!(u64_of(body, "studentsTeaching"), 6);
    assert_eq!(u64_of(body, "averageScore"), 85);
    assert_eq!(u64_of(body, "classes"), 2);

    // Unknown subjects degrade to placeholders and zeros.
    let resp = request(
        &mut stdin,
        &mut reader,
        "3",
        "dashboard.subjectTeacher",
        json!({ "subjectId": 99 }),
    );
    let body = result(&resp);
    assert_eq!(str_of(body, "subjectName"), "N/A");
    assert_eq!(u64_of(body, "studentsTeaching"), 0);
    assert_eq!(u64_of(body, "averageScore"), 0);
    assert_eq!(u64_of(body, "classes"), 0);

    drop(stdin);
    let _ = child.wait();
}

#[test]
fn student_dashboard_builds_scores_report_card_and_fee_balance() {
    let (mut child, mut stdin, mut reader) = spawn_sidecar();
    let _ = request(&mut stdin, &mut reader, "1", "session.open", json!({}));

    let resp = request(
        &mut stdin,
        &mut reader,
        "2",
        "dashboard.student",
        json!({ "studentId": 2 }),
    );
    let body = result(&resp);
    assert_eq!(str_of(body, "name"), "Bob Smith");
    assert_eq!(str_of(body, "averageScore"), "78.0");
    assert_eq!(str_of(body, "scoreTrend"), "stable");

    let scores = body
        .get("scores")
        .and_then(|v| v.as_array())
        .expect("score rows");
    assert_eq!(scores.len(), 1);
    assert_eq!(str_of(&scores[0], "subjectName"), "Science");
    assert_eq!(str_of(&scores[0], "performance"), "Satisfactory");

    let card = body.get("reportCard").expect("report card");
    assert_eq!(str_of(card, "grade"), "C");
    assert_eq!(str_of(card, "averageScore"), "78.0");

    assert_eq!(body.get("totalFees").and_then(|v| v.as_f64()), Some(500.0));
    assert_eq!(body.get("paidFees").and_then(|v| v.as_f64()), Some(0.0));
    assert_eq!(body.get("balance").and_then(|v| v.as_f64()), Some(500.0));

    // Student 1 sits above the trend threshold.
    let resp = request(
        &mut stdin,
        &mut reader,
        "3",
        "dashboard.student",
        json!({ "studentId": 1 }),
    );
    let body = result(&resp);
    assert_eq!(str_of(body, "scoreTrend"), "up");
    assert_eq!(
        body.get("reportCard").map(|c| str_of(c, "grade")),
        Some("B")
    );

    let resp = request(
        &mut stdin,
        &mut reader,
        "4",
        "dashboard.student",
        json!({ "studentId": 99 }),
    );
    assert_eq!(resp.get("ok").and_then(|v| v.as_bool()), Some(false));
    assert_eq!(
        resp.get("error")
            .and_then(|e| e.get("code"))
            .and_then(|v| v.as_str()),
        Some("not_found")
    );

    drop(stdin);
    let _ = child.wait();
}

#[test]
fn attendance_overview_ranks_students_with_stable_ties() {
    let (mut child, mut stdin, mut reader) = spawn_sidecar();
    let _ = request(&mut stdin, &mut reader, "1", "session.open", json!({}));

    let resp = request(
        &mut stdin,
        &mut reader,
        "2",
        "reports.attendanceOverview",
        json!({}),
    );
    let body = result(&resp);
    assert_eq!(u64_of(body, "totalStudents"), 10);
    assert_eq!(u64_of(body, "excellent"), 2);
    assert_eq!(u64_of(body, "good"), 0);
    assert_eq!(u64_of(body, "average"), 0);
    assert_eq!(u64_of(body, "poor"), 8);
    assert_eq!(u64_of(body, "averagePercentage"), 20);

    let rankings = body
        .get("rankings")
        .and_then(|v| v.as_array())
        .expect("rankings");
    assert_eq!(rankings.len(), 10);
    // Students 1 and 3 both sit at 100%; the earlier one keeps the top rank.
    assert_eq!(u64_of(&rankings[0], "studentId"), 1);
    assert_eq!(u64_of(&rankings[0], "percentage"), 100);
    assert_eq!(str_of(&rankings[0], "rating"), "Excellent");
    assert_eq!(u64_of(&rankings[1], "studentId"), 3);
    assert_eq!(u64_of(&rankings[2], "studentId"), 2);
    assert_eq!(u64_of(&rankings[2], "percentage"), 0);
    assert_eq!(str_of(&rankings[2], "rating"), "Poor");

    drop(stdin);
    let _ = child.wait();
}

#[test]
fn results_overview_breaks_down_distribution_and_performance() {
    let (mut child, mut stdin, mut reader) = spawn_sidecar();
    let _ = request(&mut stdin, &mut reader, "1", "session.open", json!({}));

    let resp = request(
        &mut stdin,
        &mut reader,
        "2",
        "reports.resultsOverview",
        json!({}),
    );
    let body = result(&resp);
    assert_eq!(u64_of(body, "totalResults"), 2);
    assert_eq!(u64_of(body, "totalSubjects"), 5);
    assert_eq!(str_of(body, "overallAverage"), "81.5");

    let dist = body.get("distribution").expect("distribution");
    let band = |name: &str| dist.get(name).expect(name);
    assert_eq!(u64_of(band("excellent"), "count"), 0);
    assert_eq!(str_of(band("excellent"), "share"), "0.0");
    assert_eq!(u64_of(band("good"), "count"), 1);
    assert_eq!(str_of(band("good"), "share"), "50.0");
    assert_eq!(u64_of(band("average"), "count"), 1);
    assert_eq!(u64_of(band("poor"), "count"), 0);

    let subjects = body
        .get("subjectPerformance")
        .and_then(|v| v.as_array())
        .expect("subjectPerformance");
    assert_eq!(subjects.len(), 5);
    let maths = subjects
        .iter()
        .find(|s| str_of(s, "name") == "Mathematics")
        .expect("maths row");
    assert_eq!(u64_of(maths, "studentCount"), 1);
    assert_eq!(str_of(maths, "averageScore"), "85.0");
    assert_eq!(str_of(maths, "level"), "Excellent");
    let art = subjects
        .iter()
        .find(|s| str_of(s, "name") == "Art")
        .expect("art row");
    assert_eq!(str_of(art, "averageScore"), "0.0");
    assert_eq!(str_of(art, "level"), "Poor");

    let classes = body
        .get("classPerformance")
        .and_then(|v| v.as_array())
        .expect("classPerformance");
    let grade5a = classes
        .iter()
        .find(|c| str_of(c, "name") == "Grade 5A")
        .expect("class row");
    assert_eq!(str_of(grade5a, "classRep"), "Alice Johnson");
    assert_eq!(u64_of(grade5a, "studentCount"), 3);
    assert_eq!(str_of(grade5a, "averageScore"), "85.0");
    assert_eq!(str_of(grade5a, "level"), "Excellent");
    let grade4b = classes
        .iter()
        .find(|c| str_of(c, "name") == "Grade 4B")
        .expect("class row");
    assert_eq!(str_of(grade4b, "averageScore"), "78.0");
    assert_eq!(str_of(grade4b, "level"), "Good");

    drop(stdin);
    let _ = child.wait();
}

#[test]
fn students_overview_groups_by_grade_and_ranks_top_performers() {
    let (mut child, mut stdin, mut reader) = spawn_sidecar();
    let _ = request(&mut stdin, &mut reader, "1", "session.open", json!({}));

    let resp = request(
        &mut stdin,
        &mut reader,
        "2",
        "reports.studentsOverview",
        json!({}),
    );
    let body = result(&resp);
    assert_eq!(u64_of(body, "totalStudents"), 10);
    assert_eq!(u64_of(body, "totalClasses"), 2);
    assert_eq!(str_of(body, "averageScore"), "81.5");
    assert_eq!(str_of(body, "attendanceRate"), "66.7");

    let by_grade = body
        .get("byGrade")
        .and_then(|v| v.as_array())
        .expect("byGrade");
    assert_eq!(by_grade.len(), 8);
    assert_eq!(str_of(&by_grade[0], "grade"), "1st");
    let fourth = by_grade
        .iter()
        .find(|g| str_of(g, "grade") == "4th")
        .expect("4th grade row");
    assert_eq!(u64_of(fourth, "count"), 2);
    assert_eq!(str_of(fourth, "share"), "20.0");

    let top = body
        .get("topPerformers")
        .and_then(|v| v.as_array())
        .expect("topPerformers");
    assert_eq!(top.len(), 10);
    assert_eq!(u64_of(&top[0], "studentId"), 1);
    assert_eq!(str_of(&top[0], "averageScore"), "85.0");
    assert_eq!(str_of(&top[0], "level"), "Good");
    assert_eq!(str_of(&top[0], "attendanceRate"), "100.0");
    assert_eq!(u64_of(&top[1], "studentId"), 2);
    assert_eq!(str_of(&top[1], "level"), "Average");
    // Everyone without results sits at zero with the lowest band.
    assert_eq!(str_of(&top[9], "averageScore"), "0.0");
    assert_eq!(str_of(&top[9], "level"), "Needs Attention");

    drop(stdin);
    let _ = child.wait();
}
