//! Diesel schema for issue list persistence.

diesel::table! {
    /// Issue records living in exactly one user's `my` list.
    todo_issues (id) {
        /// Issue identifier.
        id -> Uuid,
        /// User whose `my` list holds the issue.
        #[max_length = 255]
        owner_id -> Varchar,
        /// Issue text.
        message -> Text,
        /// Originating thread, if any.
        #[max_length = 255]
        post_id -> Nullable<Varchar>,
        /// Sender of a received issue.
        #[max_length = 255]
        foreign_user_id -> Nullable<Varchar>,
        /// Sender-side tracking record of a received issue.
        foreign_issue_id -> Nullable<Uuid>,
        /// Creation timestamp.
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Sender-side tracking records for sent issues.
    todo_sent_records (id) {
        /// Tracking record identifier.
        id -> Uuid,
        /// Sending user.
        #[max_length = 255]
        sender_id -> Varchar,
        /// Receiving user.
        #[max_length = 255]
        receiver_id -> Varchar,
        /// Issue in the receiver's queue.
        issue_id -> Uuid,
        /// Send timestamp.
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Ordered list membership, one row per list entry.
    todo_list_entries (position) {
        /// Monotonic insertion position.
        position -> Int8,
        /// List owner.
        #[max_length = 255]
        user_id -> Varchar,
        /// List kind (`my`, `in`, `out`).
        #[max_length = 8]
        list_kind -> Varchar,
        /// Issue or tracking record identifier.
        entry_id -> Uuid,
    }
}
