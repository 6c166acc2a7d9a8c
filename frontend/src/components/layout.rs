use crate::auth::{logout, use_auth};
use crate::web::route::AppRoute;
use crate::web::router::{Link, use_router};
use leptos::prelude::*;
use leptos::task::spawn_local;
use routedesk::pages::Notice;

/// Navigation bar and page frame shared by every signed-in page.
#[component]
pub fn PageShell(title: &'static str, children: Children) -> impl IntoView {
    let auth = use_auth();
    let router = use_router();

    let on_logout = move |_| {
        spawn_local(async move {
            logout(&auth).await;
        });
    };

    let current = router.current_route();
    let nav_class = move |route: AppRoute| {
        if current.get_untracked() == route {
            "btn btn-ghost btn-sm btn-active"
        } else {
            "btn btn-ghost btn-sm"
        }
    };

    view! {
        <div class="min-h-screen bg-base-200 p-4 md:p-8 font-sans">
            <div class="max-w-7xl mx-auto space-y-6">
                <div class="navbar bg-base-100 rounded-box shadow-xl">
                    <div class="flex-1 gap-2">
                        <Link to=AppRoute::Dashboard class="btn btn-ghost text-xl">"RouteDesk"</Link>
                        {AppRoute::PAGES
                            .into_iter()
                            .map(|route| {
                                view! {
                                    <Link to=route class=nav_class(route)>{route.title()}</Link>
                                }
                            })
                            .collect_view()}
                    </div>
                    <div class="flex-none gap-2">
                        <span class="badge badge-neutral hidden md:inline-flex">
                            {move || auth.user().map(|u| u.email).unwrap_or_default()}
                        </span>
                        <button on:click=on_logout class="btn btn-outline btn-error btn-sm">
                            "Logout"
                        </button>
                    </div>
                </div>
                <h1 class="text-3xl font-bold">{title}</h1>
                {children()}
            </div>
        </div>
    }
}

#[component]
pub fn NoticeBanner(notice: Signal<Option<Notice>>) -> impl IntoView {
    move || {
        notice.get().map(|n| {
            let class = if n.is_error { "alert alert-error" } else { "alert alert-success" };
            view! {
                <div role="alert" class=format!("{} {}", class, n.css_class())>
                    <span>{n.text.clone()}</span>
                </div>
            }
        })
    }
}

#[component]
pub fn ErrorBanner(error: Signal<Option<String>>) -> impl IntoView {
    move || {
        error.get().map(|text| {
            view! {
                <div role="alert" class="alert alert-error message error">
                    <span>{text}</span>
                </div>
            }
        })
    }
}
