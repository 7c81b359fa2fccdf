//! Users page. New accounts are validated locally before anything is sent.

use super::page::{field, optional, ResourcePage};
use crate::commands::{add_submit, bulk_actions, PageContext};
use crate::nav::View;
use crate::table::{AddForm, ColumnDef, FieldKind, FormField, FormValues, TableConfig, TableView};
use garage_core::validation::UserSignup;
use garage_core::{NewUser, User};

pub fn columns() -> Vec<ColumnDef<User>> {
    vec![
        ColumnDef::text("name", "Name", |u: &User| u.name.clone()).min_width(14),
        ColumnDef::text("email", "Email", |u: &User| u.email.clone()).min_width(20),
        ColumnDef::text("role", "Role", |u: &User| u.role.to_string()),
        ColumnDef::optional_text("phone", "Phone", |u: &User| u.phone.clone()),
        ColumnDef::date("created_at", "Joined", |u: &User| u.created_at),
    ]
}

pub fn add_form() -> AddForm {
    AddForm {
        title: "Add user",
        fields: vec![
            FormField::new("name", "Name", FieldKind::Text).required(),
            FormField::new("email", "Email", FieldKind::Email).required(),
            FormField::new("confirm_email", "Confirm email", FieldKind::Email),
            FormField::new("password", "Password", FieldKind::Password).required(),
            FormField::new("confirm_password", "Confirm password", FieldKind::Password),
            FormField::new("role", "Role (admin/mechanic/customer)", FieldKind::Text),
            FormField::new("phone", "Phone", FieldKind::Text),
        ],
    }
}

pub fn build_payload(values: &FormValues) -> Result<NewUser, String> {
    UserSignup {
        name: field(values, "name").to_string(),
        email: field(values, "email").to_string(),
        confirm_email: field(values, "confirm_email").to_string(),
        password: values.get("password").cloned().unwrap_or_default(),
        confirm_password: values.get("confirm_password").cloned().unwrap_or_default(),
        role: optional(values, "role"),
        phone: optional(values, "phone"),
    }
    .validate()
    .map_err(|e| e.to_string())
}

pub fn page(ctx: &PageContext) -> ResourcePage<User> {
    let config = TableConfig::new(columns())
        .filter_on("email", "Filter by email...")
        .page_size(ctx.page_size)
        .add_form(add_form(), add_submit::<User, _, _>(ctx, build_payload));
    ResourcePage::new(View::Users, TableView::new(bulk_actions(config, ctx)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn values(password: &str, confirm: &str) -> FormValues {
        [
            ("name", "Jane"),
            ("email", "jane@garage.test"),
            ("password", password),
            ("confirm_password", confirm),
        ]
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
    }

    #[test]
    fn mismatched_passwords_fail_locally() {
        assert_eq!(
            build_payload(&values("secret1", "secret2")).unwrap_err(),
            "Passwords do not match"
        );
        assert!(build_payload(&values("secret1", "secret1")).is_ok());
    }
}
