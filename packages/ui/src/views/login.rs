use api::memory::{DEMO_EMAIL, DEMO_PASSWORD};
use dioxus::prelude::*;

use crate::{log_activity, use_activity_log, use_auth, use_backend, LogLevel};

#[derive(Clone, Copy, Debug, PartialEq)]
enum Mode {
    SignIn,
    SignUp,
}

/// Email and password sign-in, with a switch to account creation.
#[component]
pub fn LoginView() -> Element {
    let auth = use_auth();
    let is_demo = use_backend().is_demo();
    let mut activity_log = use_activity_log();

    let mut mode = use_signal(|| Mode::SignIn);
    let mut email = use_signal(String::new);
    let mut password = use_signal(String::new);
    let mut error = use_signal(|| Option::<String>::None);
    let mut notice = use_signal(|| Option::<String>::None);
    let mut busy = use_signal(|| false);

    let submit = move |evt: FormEvent| {
        evt.prevent_default();
        let auth = auth.clone();
        async move {
            if busy() {
                return;
            }
            busy.set(true);
            error.set(None);
            notice.set(None);
            let (address, secret) = (email(), password());
            let result = match mode() {
                Mode::SignIn => auth.sign_in(&address, &secret).await.map(|_| None),
                Mode::SignUp => auth.sign_up(&address, &secret).await.map(|signed_in| {
                    (!signed_in).then(|| "Check your inbox to confirm the account, then sign in.".to_string())
                }),
            };
            match result {
                Ok(message) => {
                    if message.is_some() {
                        mode.set(Mode::SignIn);
                    } else {
                        log_activity(&mut activity_log, LogLevel::Info, &format!("Signed in as {address}"));
                    }
                    notice.set(message);
                    password.set(String::new());
                }
                Err(e) => {
                    tracing::warn!(error = %e, "authentication failed");
                    error.set(Some(e.to_string()));
                }
            }
            busy.set(false);
        }
    };

    let (title, action, switch_prompt, switch_label) = match mode() {
        Mode::SignIn => ("Sign in", "Sign in", "No account yet?", "Create one"),
        Mode::SignUp => ("Create account", "Sign up", "Already registered?", "Sign in"),
    };

    rsx! {
        div {
            class: "login-screen",
            form {
                class: "login-card",
                onsubmit: submit,
                h1 { "Staff Portal" }
                h2 { "{title}" }
                label {
                    "Email"
                    input {
                        class: "input",
                        r#type: "email",
                        autocomplete: "username",
                        value: "{email}",
                        oninput: move |evt: FormEvent| email.set(evt.value()),
                    }
                }
                label {
                    "Password"
                    input {
                        class: "input",
                        r#type: "password",
                        autocomplete: if mode() == Mode::SignIn { "current-password" } else { "new-password" },
                        value: "{password}",
                        oninput: move |evt: FormEvent| password.set(evt.value()),
                    }
                }
                if let Some(message) = error() {
                    div { class: "form-error", "{message}" }
                }
                if let Some(message) = notice() {
                    div { class: "form-notice", "{message}" }
                }
                button {
                    class: "btn btn-primary",
                    r#type: "submit",
                    disabled: busy(),
                    if busy() { "Please wait..." } else { "{action}" }
                }
                p {
                    class: "muted",
                    "{switch_prompt} "
                    button {
                        class: "btn-link",
                        r#type: "button",
                        onclick: move |_| {
                            error.set(None);
                            mode.set(if mode() == Mode::SignIn { Mode::SignUp } else { Mode::SignIn });
                        },
                        "{switch_label}"
                    }
                }
                if is_demo {
                    div {
                        class: "login-demo",
                        "Demo mode: sign in as {DEMO_EMAIL} / {DEMO_PASSWORD}"
                    }
                }
            }
        }
    }
}
