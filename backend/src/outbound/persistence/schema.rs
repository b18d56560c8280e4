//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match `backend/migrations` exactly. Regenerate with
//! `diesel print-schema` after changing a migration.

diesel::table! {
    /// Students and faculty members.
    ///
    /// `cgpa` is set only for students; `faculty_id` only for faculty.
    users (id) {
        id -> Uuid,
        /// Trimmed, lower-cased, unique.
        email -> Varchar,
        /// PHC-formatted argon2 hash.
        password_hash -> Text,
        first_name -> Varchar,
        last_name -> Varchar,
        /// `student` or `faculty`.
        role -> Varchar,
        department -> Nullable<Varchar>,
        student_number -> Nullable<Varchar>,
        cgpa -> Nullable<Float8>,
        faculty_id -> Nullable<Varchar>,
        approved -> Bool,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// CGPA update requests and their decisions.
    cgpa_requests (id) {
        id -> Uuid,
        student_id -> Uuid,
        /// Snapshot at submission; null only on legacy rows.
        student_department -> Nullable<Varchar>,
        current_cgpa -> Float8,
        new_cgpa -> Float8,
        semester -> Varchar,
        /// `pending`, `approved`, or `rejected`.
        status -> Varchar,
        /// Array of `{name, url}` objects.
        documents -> Jsonb,
        reviewed_by -> Nullable<Uuid>,
        feedback -> Nullable<Text>,
        reviewed_at -> Nullable<Timestamptz>,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::allow_tables_to_appear_in_same_query!(users, cgpa_requests);
