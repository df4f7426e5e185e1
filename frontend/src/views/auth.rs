use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

use super::{bind_input, form_message, PageProps};
use crate::models::{Credentials, Registration};
use crate::router::Route;

const MIN_PASSWORD_LEN: usize = 8;
const INPUT_CLASS: &str = "w-full px-4 py-2 bg-input border border-input rounded-lg text-foreground focus:outline-none focus:ring-2 focus:ring-primary";

#[function_component(WelcomePage)]
pub fn welcome_page(props: &PageProps) -> Html {
    let to_login = {
        let navigate = props.ctx.navigate.clone();
        Callback::from(move |_| navigate.emit(Route::Login))
    };
    let to_register = {
        let navigate = props.ctx.navigate.clone();
        Callback::from(move |_| navigate.emit(Route::Register))
    };

    html! {
        <div class="min-h-screen flex items-center justify-center bg-background">
            <div class="w-full max-w-md bg-card border border-border rounded-2xl shadow-lg p-8 text-center space-y-6">
                <h1 class="text-3xl font-black text-[#173E63] tracking-tight">{"Finanzas"}</h1>
                <p class="text-sm text-muted-foreground">{"Track your income, expenses and monthly budgets in one place."}</p>
                <div class="flex gap-3 justify-center">
                    <button class="bg-primary text-primary-foreground px-4 py-2 rounded-lg font-semibold" onclick={to_login}>{"Login"}</button>
                    <button class="border border-border px-4 py-2 rounded-lg font-semibold text-foreground" onclick={to_register}>{"Create account"}</button>
                </div>
            </div>
        </div>
    }
}

#[function_component(LoginPage)]
pub fn login_page(props: &PageProps) -> Html {
    let email = use_state(String::new);
    let password = use_state(String::new);
    let error = use_state(|| None::<String>);
    let loading = use_state(|| false);

    let on_submit = {
        let email = email.clone();
        let password = password.clone();
        let error = error.clone();
        let loading = loading.clone();
        let ctx = props.ctx.clone();
        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            let credentials = Credentials {
                email: email.trim().to_string(),
                password: (*password).clone(),
            };
            if credentials.email.is_empty() || credentials.password.is_empty() {
                error.set(Some("Email and password are required".to_string()));
                return;
            }

            loading.set(true);
            error.set(None);
            let error = error.clone();
            let loading = loading.clone();
            let ctx = ctx.clone();
            spawn_local(async move {
                if ctx.session.login(&credentials).await {
                    ctx.navigate.emit(Route::Dashboard);
                } else {
                    error.set(Some("Invalid email or password".to_string()));
                }
                loading.set(false);
            });
        })
    };

    let to_register = {
        let navigate = props.ctx.navigate.clone();
        Callback::from(move |_| navigate.emit(Route::Register))
    };

    html! {
        <div class="min-h-screen flex items-center justify-center bg-background">
            <div class="w-full max-w-md bg-card border border-border rounded-2xl shadow-lg p-8">
                <div class="text-center mb-6">
                    <h1 class="text-2xl font-bold text-foreground">{"Welcome back"}</h1>
                    <p class="text-sm text-muted-foreground mt-2">{"Sign in to continue."}</p>
                </div>

                <form class="space-y-4" onsubmit={on_submit}>
                    <div class="space-y-1">
                        <label class="text-sm font-medium text-foreground">{"Email"}</label>
                        <input type="email" class={INPUT_CLASS} value={(*email).clone()} oninput={bind_input(&email)} />
                    </div>
                    <div class="space-y-1">
                        <label class="text-sm font-medium text-foreground">{"Password"}</label>
                        <input type="password" class={INPUT_CLASS} value={(*password).clone()} oninput={bind_input(&password)} />
                    </div>

                    { form_message(&error) }

                    <button
                        type="submit"
                        class="w-full bg-primary text-primary-foreground py-2 rounded-lg font-semibold hover:opacity-90 transition-opacity"
                        disabled={*loading}
                    >
                        { if *loading { "Please wait..." } else { "Login" } }
                    </button>
                </form>

                <div class="mt-6 text-center text-sm text-muted-foreground">
                    {"No account?"}
                    <button class="ml-2 text-primary font-semibold" onclick={to_register}>{"Sign up"}</button>
                </div>
            </div>
        </div>
    }
}

fn validate_registration(registration: &Registration, confirm: &str) -> Result<(), &'static str> {
    if registration.name.is_empty() || registration.email.is_empty() || registration.password.is_empty() {
        return Err("Name, email and password are required");
    }
    if registration.password.len() < MIN_PASSWORD_LEN {
        return Err("Password must be at least 8 characters");
    }
    if registration.password != confirm {
        return Err("Passwords do not match");
    }
    Ok(())
}

#[function_component(RegisterPage)]
pub fn register_page(props: &PageProps) -> Html {
    let name = use_state(String::new);
    let email = use_state(String::new);
    let password = use_state(String::new);
    let confirm_password = use_state(String::new);
    let error = use_state(|| None::<String>);
    let loading = use_state(|| false);

    let on_submit = {
        let name = name.clone();
        let email = email.clone();
        let password = password.clone();
        let confirm_password = confirm_password.clone();
        let error = error.clone();
        let loading = loading.clone();
        let ctx = props.ctx.clone();
        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            let registration = Registration {
                name: name.trim().to_string(),
                email: email.trim().to_string(),
                password: (*password).clone(),
            };
            if let Err(msg) = validate_registration(&registration, &confirm_password) {
                error.set(Some(msg.to_string()));
                return;
            }

            loading.set(true);
            error.set(None);
            let error = error.clone();
            let loading = loading.clone();
            let ctx = ctx.clone();
            spawn_local(async move {
                if ctx.session.register(&registration).await {
                    ctx.navigate.emit(Route::Login);
                } else {
                    error.set(Some("Could not create the account".to_string()));
                }
                loading.set(false);
            });
        })
    };

    let to_login = {
        let navigate = props.ctx.navigate.clone();
        Callback::from(move |_| navigate.emit(Route::Login))
    };

    html! {
        <div class="min-h-screen flex items-center justify-center bg-background">
            <div class="w-full max-w-md bg-card border border-border rounded-2xl shadow-lg p-8">
                <div class="text-center mb-6">
                    <h1 class="text-2xl font-bold text-foreground">{"Create account"}</h1>
                    <p class="text-sm text-muted-foreground mt-2">{"Start managing your finances."}</p>
                </div>

                <form class="space-y-4" onsubmit={on_submit}>
                    <div class="space-y-1">
                        <label class="text-sm font-medium text-foreground">{"Name"}</label>
                        <input class={INPUT_CLASS} value={(*name).clone()} oninput={bind_input(&name)} />
                    </div>
                    <div class="space-y-1">
                        <label class="text-sm font-medium text-foreground">{"Email"}</label>
                        <input type="email" class={INPUT_CLASS} value={(*email).clone()} oninput={bind_input(&email)} />
                    </div>
                    <div class="space-y-1">
                        <label class="text-sm font-medium text-foreground">{"Password"}</label>
                        <input type="password" class={INPUT_CLASS} value={(*password).clone()} oninput={bind_input(&password)} />
                    </div>
                    <div class="space-y-1">
                        <label class="text-sm font-medium text-foreground">{"Confirm Password"}</label>
                        <input type="password" class={INPUT_CLASS} value={(*confirm_password).clone()} oninput={bind_input(&confirm_password)} />
                    </div>

                    { form_message(&error) }

                    <button
                        type="submit"
                        class="w-full bg-primary text-primary-foreground py-2 rounded-lg font-semibold hover:opacity-90 transition-opacity"
                        disabled={*loading}
                    >
                        { if *loading { "Please wait..." } else { "Sign up" } }
                    </button>
                </form>

                <div class="mt-6 text-center text-sm text-muted-foreground">
                    {"Already have an account?"}
                    <button class="ml-2 text-primary font-semibold" onclick={to_login}>{"Login"}</button>
                </div>
            </div>
        </div>
    }
}
