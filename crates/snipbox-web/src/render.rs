//! Server-side page assembly. Handlers gather a payload; these functions
//! turn it into HTML. All user-supplied text goes through `escape`.

use chrono::{DateTime, Datelike, Utc};
use tower_sessions::Session;

use snipbox_types::{Snippet, User};

use crate::error::Error;
use crate::forms::{PasswordUpdateForm, SnippetCreateForm, UserLoginForm, UserSignupForm};
use crate::middleware::CurrentUser;
use crate::validator::Validator;
use crate::{csrf, session};

/// Payload shared by every rendered page.
pub struct PageData {
    pub is_authenticated: bool,
    pub csrf_token: String,
    pub flash: Option<String>,
    pub current_year: i32,
}

impl PageData {
    pub async fn gather(session: &Session, current: CurrentUser) -> Result<Self, Error> {
        Ok(Self {
            is_authenticated: current.0.is_some(),
            csrf_token: csrf::issue_token(session).await?,
            flash: session::pop_flash(session).await?,
            current_year: Utc::now().year(),
        })
    }
}

pub fn home(page: &PageData, snippets: &[Snippet]) -> String {
    let mut main = String::from("<h2>Latest Snippets</h2>\n");
    if snippets.is_empty() {
        main.push_str("<p>There's nothing to see here... yet!</p>");
    } else {
        main.push_str("<table>\n");
        for s in snippets {
            main.push_str(&format!(
                "<tr><td><a href='/snippet/view/{id}'>{title}</a></td><td>{created}</td><td>#{id}</td></tr>\n",
                id = s.id,
                title = escape(&s.title),
                created = human_date(&s.created),
            ));
        }
        main.push_str("</table>");
    }
    layout(page, "Home", &main)
}

pub fn snippet_view(page: &PageData, snippet: &Snippet) -> String {
    let main = format!(
        "<div class='snippet'>\n\
         <div class='metadata'><strong>{title}</strong> <span>#{id}</span></div>\n\
         <pre><code>{content}</code></pre>\n\
         <div class='metadata'><time>Created: {created}</time> <time>Expires: {expires}</time></div>\n\
         </div>",
        id = snippet.id,
        title = escape(&snippet.title),
        content = escape(&snippet.content),
        created = human_date(&snippet.created),
        expires = human_date(&snippet.expires),
    );
    layout(page, &snippet.title, &main)
}

pub fn snippet_create(page: &PageData, form: &SnippetCreateForm) -> String {
    let checked = |days: i64| if form.expires == days { "checked" } else { "" };
    let main = format!(
        "<h2>Create a New Snippet</h2>\n\
         <form action='/snippet/create' method='POST'>\n\
         {csrf}\n\
         <div><label>Title:</label>{title_err}<input type='text' name='title' value='{title}'></div>\n\
         <div><label>Content:</label>{content_err}<textarea name='content'>{content}</textarea></div>\n\
         <div><label>Delete in:</label>{expires_err}\n\
         <input type='radio' name='expires' value='365' {c365}> One Year\n\
         <input type='radio' name='expires' value='7' {c7}> One Week\n\
         <input type='radio' name='expires' value='1' {c1}> One Day\n\
         </div>\n\
         <div><input type='submit' value='Publish snippet'></div>\n\
         </form>",
        csrf = csrf_input(page),
        title_err = field_error(&form.validator, "title"),
        title = escape(&form.title),
        content_err = field_error(&form.validator, "content"),
        content = escape(&form.content),
        expires_err = field_error(&form.validator, "expires"),
        c365 = checked(365),
        c7 = checked(7),
        c1 = checked(1),
    );
    layout(page, "Create a New Snippet", &main)
}

pub fn signup(page: &PageData, form: &UserSignupForm) -> String {
    let main = format!(
        "<h2>Signup</h2>\n\
         <form action='/user/signup' method='POST' novalidate>\n\
         {csrf}\n\
         <div><label>Name:</label>{name_err}<input type='text' name='name' value='{name}'></div>\n\
         <div><label>Email:</label>{email_err}<input type='email' name='email' value='{email}'></div>\n\
         <div><label>Password:</label>{password_err}<input type='password' name='password'></div>\n\
         <div><input type='submit' value='Signup'></div>\n\
         </form>",
        csrf = csrf_input(page),
        name_err = field_error(&form.validator, "name"),
        name = escape(&form.name),
        email_err = field_error(&form.validator, "email"),
        email = escape(&form.email),
        password_err = field_error(&form.validator, "password"),
    );
    layout(page, "Signup", &main)
}

pub fn login(page: &PageData, form: &UserLoginForm) -> String {
    let main = format!(
        "<h2>Login</h2>\n\
         <form action='/user/login' method='POST' novalidate>\n\
         {csrf}\n\
         {non_field_errs}\
         <div><label>Email:</label>{email_err}<input type='email' name='email' value='{email}'></div>\n\
         <div><label>Password:</label>{password_err}<input type='password' name='password'></div>\n\
         <div><input type='submit' value='Login'></div>\n\
         </form>",
        csrf = csrf_input(page),
        non_field_errs = non_field_errors(&form.validator),
        email_err = field_error(&form.validator, "email"),
        email = escape(&form.email),
        password_err = field_error(&form.validator, "password"),
    );
    layout(page, "Login", &main)
}

pub fn account(page: &PageData, user: &User) -> String {
    let main = format!(
        "<h2>Your Account</h2>\n\
         <table>\n\
         <tr><th>Name</th><td>{name}</td></tr>\n\
         <tr><th>Email</th><td>{email}</td></tr>\n\
         <tr><th>Joined</th><td>{joined}</td></tr>\n\
         </table>\n\
         <p><a href='/account/password/update'>Change password</a></p>",
        name = escape(&user.name),
        email = escape(&user.email),
        joined = human_date(&user.created),
    );
    layout(page, "Your Account", &main)
}

pub fn password_update(page: &PageData, form: &PasswordUpdateForm) -> String {
    let main = format!(
        "<h2>Change Password</h2>\n\
         <form action='/account/password/update' method='POST' novalidate>\n\
         {csrf}\n\
         <div><label>Current password:</label>{cur_err}<input type='password' name='current_password'></div>\n\
         <div><label>New password:</label>{new_err}<input type='password' name='new_password'></div>\n\
         <div><label>Confirm new password:</label>{confirm_err}<input type='password' name='new_password_confirmation'></div>\n\
         <div><input type='submit' value='Change password'></div>\n\
         </form>",
        csrf = csrf_input(page),
        cur_err = field_error(&form.validator, "current_password"),
        new_err = field_error(&form.validator, "new_password"),
        confirm_err = field_error(&form.validator, "new_password_confirmation"),
    );
    layout(page, "Change Password", &main)
}

/// Bare page for error responses; rendered without session state.
pub fn error_page(message: &str) -> String {
    format!(
        "<!doctype html>\n<html lang='en'>\n<head><meta charset='utf-8'><title>{0} - Snipbox</title></head>\n\
         <body><h1>{0}</h1></body>\n</html>",
        escape(message)
    )
}

fn layout(page: &PageData, title: &str, main: &str) -> String {
    let nav = if page.is_authenticated {
        format!(
            "<a href='/'>Home</a> <a href='/snippet/create'>Create snippet</a> <a href='/account/view'>Account</a> \
             <form action='/user/logout' method='POST'>{csrf}<button>Logout</button></form>",
            csrf = csrf_input(page),
        )
    } else {
        "<a href='/'>Home</a> <a href='/user/signup'>Signup</a> <a href='/user/login'>Login</a>"
            .to_string()
    };

    let flash = page
        .flash
        .as_deref()
        .map(|f| format!("<div class='flash'>{}</div>\n", escape(f)))
        .unwrap_or_default();

    format!(
        "<!doctype html>\n\
         <html lang='en'>\n\
         <head><meta charset='utf-8'><title>{title} - Snipbox</title></head>\n\
         <body>\n\
         <header><h1><a href='/'>Snipbox</a></h1></header>\n\
         <nav>{nav}</nav>\n\
         {flash}\
         <main>{main}</main>\n\
         <footer>&copy; {year}</footer>\n\
         </body>\n\
         </html>",
        title = escape(title),
        nav = nav,
        flash = flash,
        main = main,
        year = page.current_year,
    )
}

fn csrf_input(page: &PageData) -> String {
    format!(
        "<input type='hidden' name='csrf_token' value='{}'>",
        page.csrf_token
    )
}

fn field_error(validator: &Validator, field: &str) -> String {
    validator
        .field_error(field)
        .map(|msg| format!("<label class='error'>{}</label>", escape(msg)))
        .unwrap_or_default()
}

fn non_field_errors(validator: &Validator) -> String {
    validator
        .non_field_errors
        .iter()
        .map(|msg| format!("<div class='error'>{}</div>\n", escape(msg)))
        .collect()
}

/// "02 Jan 2006 at 15:04" style human date.
fn human_date(t: &DateTime<Utc>) -> String {
    t.format("%d %b %Y at %H:%M").to_string()
}

/// Minimal HTML escaping for user-supplied text.
fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page() -> PageData {
        PageData {
            is_authenticated: false,
            csrf_token: "tok123".into(),
            flash: None,
            current_year: 2026,
        }
    }

    #[test]
    fn escape_neutralizes_markup() {
        assert_eq!(
            escape("<script>alert('&')</script>"),
            "&lt;script&gt;alert(&#39;&amp;&#39;)&lt;/script&gt;"
        );
    }

    #[test]
    fn forms_embed_the_csrf_token() {
        let body = signup(&page(), &UserSignupForm::default());
        assert!(body.contains("<form action='/user/signup' method='POST' novalidate>"));
        assert!(body.contains("name='csrf_token' value='tok123'"));
    }

    #[test]
    fn invalid_form_repopulates_submitted_values() {
        let mut form = SnippetCreateForm {
            title: "My <title>".into(),
            content: "body".into(),
            expires: 255,
            ..Default::default()
        };
        form.validate();

        let body = snippet_create(&page(), &form);
        assert!(body.contains("value='My &lt;title&gt;'"));
        assert!(body.contains("This field must equal 1, 7, or 365"));
    }

    #[test]
    fn flash_renders_once_supplied() {
        let mut p = page();
        p.flash = Some("Snippet succesfully created!".into());
        let body = home(&p, &[]);
        assert!(body.contains("Snippet succesfully created!"));
    }
}
