//! Diesel table definitions. Keep in step with `backend/migrations`.

diesel::table! {
    /// One row per student, keyed by the stored identifier text.
    students (scholar_id) {
        scholar_id -> Text,
        name -> Nullable<Text>,
        email -> Nullable<Text>,
        user_name -> Nullable<Text>,
        profile_image -> Text,
        cgpa -> Float8,
        sgpa_curr -> Float8,
        sgpa_prev -> Float8,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Per-subject attendance. `entry_order` preserves first-recorded order.
    attendance_entries (scholar_id, subject_code) {
        scholar_id -> Text,
        subject_code -> Text,
        total -> Int8,
        attended -> Int8,
        entry_order -> Int8,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Courses per branch and semester; `position` keeps catalogue order.
    course_catalogue (branch_short, semester, position) {
        branch_short -> Text,
        branch_code -> Nullable<Int4>,
        semester -> Int2,
        position -> Int4,
        code -> Text,
        name -> Text,
        credits -> Float8,
    }
}

diesel::allow_tables_to_appear_in_same_query!(students, attendance_entries, course_catalogue);
