//! Sign-in form state: field values, touched flags and validation errors.

use unicode_segmentation::UnicodeSegmentation;

use crate::auth::Credentials;
use crate::schema::{FieldError, SignInSchema, ValidationErrors};

/// Single-line text input with proper Unicode grapheme cluster support.
///
/// The cursor is a grapheme index, never a byte offset.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct TextField {
    text: String,
    cursor: usize,
}

impl TextField {
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Text left of the cursor, used to place the terminal cursor.
    #[must_use]
    pub fn text_before_cursor(&self) -> &str {
        &self.text[..self.byte_index()]
    }

    pub fn move_cursor_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn move_cursor_right(&mut self) {
        let cursor_moved_right = self.cursor.saturating_add(1);
        self.cursor = self.clamp_cursor(cursor_moved_right);
    }

    pub fn move_cursor_home(&mut self) {
        self.cursor = 0;
    }

    pub fn move_cursor_end(&mut self) {
        self.cursor = self.grapheme_count();
    }

    /// Newlines are dropped: the field is single-line.
    pub fn enter_char(&mut self, new_char: char) {
        if matches!(new_char, '\n' | '\r') {
            return;
        }
        let index = self.byte_index();
        self.text.insert(index, new_char);
        self.move_cursor_right();
    }

    pub fn enter_text(&mut self, text: &str) {
        let single_line: String = text.chars().filter(|c| !matches!(c, '\n' | '\r')).collect();
        if single_line.is_empty() {
            return;
        }
        let index = self.byte_index();
        self.text.insert_str(index, &single_line);
        let inserted = single_line.graphemes(true).count();
        self.cursor = self.clamp_cursor(self.cursor.saturating_add(inserted));
    }

    pub fn delete_char(&mut self) {
        if self.cursor == 0 {
            return;
        }

        let start = self.byte_index_at(self.cursor - 1);
        let end = self.byte_index_at(self.cursor);
        self.text.replace_range(start..end, "");
        self.move_cursor_left();
    }

    pub fn delete_char_forward(&mut self) {
        if self.cursor >= self.grapheme_count() {
            return;
        }

        let start = self.byte_index_at(self.cursor);
        let end = self.byte_index_at(self.cursor + 1);
        self.text.replace_range(start..end, "");
    }

    pub fn clear(&mut self) {
        self.text.clear();
        self.cursor = 0;
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text.clear();
        self.cursor = 0;
        self.enter_text(&text.into());
    }

    #[must_use]
    pub fn grapheme_count(&self) -> usize {
        self.text.graphemes(true).count()
    }

    fn byte_index(&self) -> usize {
        self.byte_index_at(self.cursor)
    }

    fn byte_index_at(&self, grapheme_index: usize) -> usize {
        self.text
            .grapheme_indices(true)
            .nth(grapheme_index)
            .map_or(self.text.len(), |(i, _)| i)
    }

    fn clamp_cursor(&self, new_cursor_pos: usize) -> usize {
        new_cursor_pos.min(self.grapheme_count())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Username,
    Password,
}

impl Field {
    pub const ALL: [Self; 2] = [Self::Username, Self::Password];

    /// Wire name, also used as the JSON key of the credentials body.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Username => "username",
            Self::Password => "password",
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Username => "Usuario",
            Self::Password => "Contraseña",
        }
    }

    #[must_use]
    pub const fn placeholder(self) -> &'static str {
        match self {
            Self::Username => "erielit",
            Self::Password => "••••••••",
        }
    }

    #[must_use]
    pub const fn is_secret(self) -> bool {
        matches!(self, Self::Password)
    }
}

/// Form-state controller for the sign-in page.
///
/// Validation runs on every change and on blur. Errors are recorded for all
/// fields but only surfaced for fields the user has touched.
#[derive(Debug, Default, Clone)]
pub struct SignInForm {
    username: TextField,
    password: TextField,
    username_touched: bool,
    password_touched: bool,
    errors: ValidationErrors,
}

impl SignInForm {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn field(&self, field: Field) -> &TextField {
        match field {
            Field::Username => &self.username,
            Field::Password => &self.password,
        }
    }

    /// Apply an edit to `field` and re-validate the whole form.
    pub fn edit<R>(&mut self, field: Field, f: impl FnOnce(&mut TextField) -> R) -> R {
        let before = self.field(field).text().to_owned();
        let result = f(self.field_mut(field));
        if self.field(field).text() != before {
            self.validate();
        }
        result
    }

    pub fn set_value(&mut self, field: Field, value: impl Into<String>) {
        let value = value.into();
        self.edit(field, |input| input.set_text(value));
    }

    #[must_use]
    pub fn value(&self, field: Field) -> &str {
        self.field(field).text()
    }

    /// Mark `field` as touched and re-validate.
    pub fn blur(&mut self, field: Field) {
        *self.touched_mut(field) = true;
        self.validate();
    }

    #[must_use]
    pub fn is_touched(&self, field: Field) -> bool {
        match field {
            Field::Username => self.username_touched,
            Field::Password => self.password_touched,
        }
    }

    /// The error to display for `field`: present only once the field is touched.
    #[must_use]
    pub fn visible_error(&self, field: Field) -> Option<&FieldError> {
        if self.is_touched(field) {
            self.errors.get(field)
        } else {
            None
        }
    }

    #[must_use]
    pub fn errors(&self) -> &ValidationErrors {
        &self.errors
    }

    /// True until a validation run records an error.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Touch every field, validate, and hand out credentials only for a valid form.
    pub fn begin_submit(&mut self) -> Result<Credentials, ValidationErrors> {
        for field in Field::ALL {
            *self.touched_mut(field) = true;
        }
        self.validate();
        if self.errors.is_empty() {
            Ok(Credentials::new(self.username.text(), self.password.text()))
        } else {
            Err(self.errors.clone())
        }
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    fn validate(&mut self) {
        self.errors = SignInSchema::validate(self.username.text(), self.password.text());
    }

    fn field_mut(&mut self, field: Field) -> &mut TextField {
        match field {
            Field::Username => &mut self.username,
            Field::Password => &mut self.password,
        }
    }

    fn touched_mut(&mut self, field: Field) -> &mut bool {
        match field {
            Field::Username => &mut self.username_touched,
            Field::Password => &mut self.password_touched,
        }
    }
}
