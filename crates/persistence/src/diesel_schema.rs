// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

// Maintained by hand to match `migrations/`.

diesel::table! {
    booking_line_items (line_item_id) {
        line_item_id -> BigInt,
        booking_id -> Text,
        position -> Integer,
        service_type_name -> Text,
        room_size -> Text,
        unit_price -> BigInt,
        quantity -> Integer,
        line_total -> BigInt,
    }
}

diesel::table! {
    bookings (booking_id) {
        booking_id -> Text,
        customer_id -> BigInt,
        service_name -> Text,
        service_date -> Text,
        time_slot -> Text,
        service_address -> Text,
        special_notes -> Nullable<Text>,
        subtotal -> BigInt,
        discount_amount -> BigInt,
        coupon_code -> Nullable<Text>,
        coupon_discount -> BigInt,
        total_amount -> BigInt,
        payment_method -> Text,
        payment_status -> Text,
        payment_reference -> Nullable<Text>,
        booking_status -> Text,
        assigned_technician_id -> Nullable<BigInt>,
        created_at -> Text,
        updated_at -> Text,
    }
}

diesel::table! {
    catalog_entries (catalog_entry_id) {
        catalog_entry_id -> BigInt,
        service_name -> Text,
        service_type_name -> Text,
        room_size -> Text,
        unit_price -> BigInt,
        is_active -> Integer,
    }
}

diesel::table! {
    coupons (code) {
        code -> Text,
        title -> Text,
        start_date -> Text,
        end_date -> Text,
        percentage_bp -> Integer,
    }
}

diesel::table! {
    notifications (notification_id) {
        notification_id -> BigInt,
        recipient_kind -> Text,
        recipient_id -> BigInt,
        title -> Text,
        message -> Text,
        related_booking_id -> Nullable<Text>,
        created_at -> Text,
        is_read -> Integer,
    }
}

diesel::table! {
    principals (principal_id) {
        principal_id -> BigInt,
        kind -> Text,
        login_name -> Text,
        display_name -> Text,
        phone -> Nullable<Text>,
        password_hash -> Text,
        created_at -> Text,
    }
}

diesel::table! {
    sessions (session_id) {
        session_id -> BigInt,
        session_token -> Text,
        principal_id -> BigInt,
        created_at -> Text,
        expires_at -> Text,
    }
}

diesel::table! {
    status_log (status_log_id) {
        status_log_id -> BigInt,
        booking_id -> Text,
        technician_id -> BigInt,
        status -> Text,
        recorded_at -> Text,
        notes -> Nullable<Text>,
        location_lat -> Nullable<Double>,
        location_lng -> Nullable<Double>,
    }
}

diesel::joinable!(booking_line_items -> bookings (booking_id));
diesel::joinable!(sessions -> principals (principal_id));
diesel::joinable!(status_log -> bookings (booking_id));

diesel::allow_tables_to_appear_in_same_query!(
    booking_line_items,
    bookings,
    catalog_entries,
    coupons,
    notifications,
    principals,
    sessions,
    status_log,
);
