use crate::auth::{login, signup, use_auth};
use leptos::prelude::*;
use leptos::task::spawn_local;

#[component]
pub fn LoginPage() -> impl IntoView {
    let auth = use_auth();

    let (signing_up, set_signing_up) = signal(false);
    let (email, set_email) = signal(auth.state.with_untracked(|s| s.last_email.clone()));
    let (password, set_password) = signal(String::new());
    let (warehouse, set_warehouse) = signal(String::new());
    let (phone, set_phone) = signal(String::new());
    let (is_submitting, set_is_submitting) = signal(false);
    let (error_msg, set_error_msg) = signal(Option::<String>::None);

    // Navigation after success is handled by the router's auth watcher.
    let on_submit = move |ev: leptos::web_sys::SubmitEvent| {
        ev.prevent_default();
        if email.get().trim().is_empty() || password.get().is_empty() {
            set_error_msg.set(Some("Please enter both email and password".to_string()));
            return;
        }

        set_is_submitting.set(true);
        set_error_msg.set(None);

        let is_signup = signing_up.get_untracked();
        let (email, password) = (email.get_untracked(), password.get_untracked());
        let (warehouse, phone) = (warehouse.get_untracked(), phone.get_untracked());
        spawn_local(async move {
            let result = if is_signup {
                signup(&auth, email, password, warehouse, phone).await
            } else {
                login(&auth, email, password).await
            };
            if let Err(e) = result {
                let fallback = if is_signup { "Signup failed" } else { "Login failed" };
                set_error_msg.set(Some(e.user_message(fallback)));
            }
            set_is_submitting.set(false);
        });
    };

    let toggle = move |_| {
        set_signing_up.update(|s| *s = !*s);
        set_error_msg.set(None);
    };

    view! {
        <div class="hero min-h-screen bg-base-200">
            <div class="hero-content flex-col w-full max-w-md">
                <div class="text-center mb-4">
                    <h1 class="text-3xl font-bold">"RouteDesk"</h1>
                    <p class="text-base-content/70">
                        {move || if signing_up.get() { "Create your dispatcher account" } else { "Sign in to manage deliveries" }}
                    </p>
                </div>

                <div class="card shrink-0 w-full shadow-2xl bg-base-100">
                    <form class="card-body" on:submit=on_submit>
                        <Show when=move || error_msg.get().is_some()>
                            <div role="alert" class="alert alert-error text-sm py-2">
                                <span>{move || error_msg.get().unwrap_or_default()}</span>
                            </div>
                        </Show>

                        <div class="form-control">
                            <label class="label" for="email">
                                <span class="label-text">"Email"</span>
                            </label>
                            <input
                                id="email"
                                type="email"
                                on:input=move |ev| set_email.set(event_target_value(&ev))
                                prop:value=email
                                class="input input-bordered"
                                required
                            />
                        </div>
                        <div class="form-control">
                            <label class="label" for="password">
                                <span class="label-text">"Password"</span>
                            </label>
                            <input
                                id="password"
                                type="password"
                                on:input=move |ev| set_password.set(event_target_value(&ev))
                                prop:value=password
                                class="input input-bordered"
                                required
                            />
                        </div>

                        <Show when=move || signing_up.get()>
                            <div class="form-control">
                                <label class="label" for="warehouse">
                                    <span class="label-text">"Warehouse (optional)"</span>
                                </label>
                                <input
                                    id="warehouse"
                                    type="text"
                                    placeholder="W010"
                                    on:input=move |ev| set_warehouse.set(event_target_value(&ev))
                                    prop:value=warehouse
                                    class="input input-bordered"
                                />
                            </div>
                            <div class="form-control">
                                <label class="label" for="phone">
                                    <span class="label-text">"Phone (optional)"</span>
                                </label>
                                <input
                                    id="phone"
                                    type="tel"
                                    on:input=move |ev| set_phone.set(event_target_value(&ev))
                                    prop:value=phone
                                    class="input input-bordered"
                                />
                            </div>
                        </Show>

                        <div class="form-control mt-6">
                            <button class="btn btn-primary" disabled=move || is_submitting.get()>
                                {move || match (is_submitting.get(), signing_up.get()) {
                                    (true, _) => view! { <span class="loading loading-spinner"></span> "Please wait..." }.into_any(),
                                    (false, true) => "Create account".into_any(),
                                    (false, false) => "Sign in".into_any(),
                                }}
                            </button>
                        </div>
                        <button type="button" class="btn btn-link btn-sm" on:click=toggle>
                            {move || if signing_up.get() { "Already have an account? Sign in" } else { "No account? Sign up" }}
                        </button>
                    </form>
                </div>
            </div>
        </div>
    }
}
