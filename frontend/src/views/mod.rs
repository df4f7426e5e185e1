//! Pages and the shared chrome around them.

mod auth;
mod budgets;
mod categories;
mod dashboard;
mod movements;

pub use auth::{LoginPage, RegisterPage, WelcomePage};
pub use budgets::BudgetsPage;
pub use categories::CategoriesPage;
pub use dashboard::{DashboardPage, ReportsPage};
pub use movements::MovementsPage;

use yew::prelude::*;

use crate::app::AppContext;
use crate::format::{format_currency, CURRENCY_SYMBOL};
use crate::router::Route;

#[derive(Properties, PartialEq)]
pub struct PageProps {
    pub ctx: AppContext,
}

#[derive(Properties, PartialEq)]
pub struct LayoutProps {
    pub ctx: AppContext,
    pub active: Route,
    pub children: Children,
}

#[function_component(Layout)]
pub fn layout(props: &LayoutProps) -> Html {
    html! {
        <div class="flex h-screen bg-background">
            <div class="hidden md:flex">
                <Sidebar ctx={props.ctx.clone()} active={props.active} />
            </div>

            <div class="flex-1 flex flex-col overflow-hidden">
                <Header ctx={props.ctx.clone()} />
                <main class="flex-1 overflow-y-auto">
                    { for props.children.iter() }
                </main>
            </div>
        </div>
    }
}

#[function_component(Header)]
fn header(props: &PageProps) -> Html {
    let greeting = props
        .ctx
        .session
        .user()
        .map(|user| format!("Hi, {}", user.display_name()))
        .unwrap_or_default();

    html! {
        <header class="bg-[#D8E1E8] border-b border-border h-16 flex items-center justify-between px-6">
            <div class="flex-1"></div>
            <span class="text-sm font-medium text-[#173E63]">{ greeting }</span>
        </header>
    }
}

struct NavItem {
    label: &'static str,
    route: Route,
    icon: fn() -> Html,
}

const NAV_ITEMS: [NavItem; 5] = [
    NavItem {
        label: "Dashboard",
        route: Route::Dashboard,
        icon: icon_layout_grid,
    },
    NavItem {
        label: "Movements",
        route: Route::Movements,
        icon: icon_credit_card,
    },
    NavItem {
        label: "Categories",
        route: Route::Categories,
        icon: icon_tag,
    },
    NavItem {
        label: "Budgets",
        route: Route::Budgets,
        icon: icon_wallet,
    },
    NavItem {
        label: "Reports",
        route: Route::Reports,
        icon: icon_bar_chart,
    },
];

#[derive(Properties, PartialEq)]
struct SidebarProps {
    ctx: AppContext,
    active: Route,
}

#[function_component(Sidebar)]
fn sidebar(props: &SidebarProps) -> Html {
    let on_logout = {
        let session = props.ctx.session.clone();
        Callback::from(move |_| session.logout())
    };

    html! {
        <div class="w-[220px] h-screen bg-[#D8E1E8] p-4 flex flex-col">
            <div class="flex items-center gap-3 px-2 mb-8">
                <span class="text-[#173E63] text-2xl font-black tracking-tight">{"Finanzas"}</span>
            </div>

            <div class="flex-1 bg-[#173E63] rounded-[24px] flex flex-col py-6 px-3 shadow-lg">
                <nav class="flex-1 space-y-2">
                    { for NAV_ITEMS.iter().map(|item| {
                        let class_name = if item.route == props.active {
                            "flex items-center gap-3 px-4 py-3 rounded-xl transition-all text-[13px] font-medium bg-[#B2CBDE] text-[#173E63] w-full"
                        } else {
                            "flex items-center gap-3 px-4 py-3 rounded-xl transition-all text-[13px] font-medium text-slate-300 hover:bg-white/5 hover:text-white w-full"
                        };
                        let navigate = props.ctx.navigate.clone();
                        let route = item.route;

                        html! {
                            <button type="button" class={class_name} onclick={Callback::from(move |_| navigate.emit(route))}>
                                <span class="shrink-0">{ (item.icon)() }</span>
                                <span class="truncate whitespace-nowrap text-left">{ item.label }</span>
                            </button>
                        }
                    }) }
                </nav>

                <div class="mt-auto pt-4">
                    <button onclick={on_logout} class="flex items-center gap-3 w-full px-4 py-3 rounded-xl hover:bg-white/10 transition-colors text-[13px] font-medium text-slate-300">
                        { icon_log_out() }
                        <span>{"Log Out"}</span>
                    </button>
                </div>
            </div>
        </div>
    }
}

#[function_component(NotFoundPage)]
pub fn not_found_page(props: &PageProps) -> Html {
    let go_home = {
        let navigate = props.ctx.navigate.clone();
        Callback::from(move |_| navigate.emit(Route::Welcome))
    };

    html! {
        <div class="min-h-screen flex flex-col items-center justify-center gap-4 bg-background">
            <h1 class="text-2xl font-bold text-foreground">{"Page not found"}</h1>
            <button class="text-primary font-semibold" onclick={go_home}>{"Go back home"}</button>
        </div>
    }
}

fn page_shell(title: &'static str, actions: Html, children: Html) -> Html {
    html! {
        <div class="p-6 max-w-7xl mx-auto">
            <div class="flex items-center justify-between pb-4 border-b border-border">
                <h1 class="text-2xl font-bold text-foreground">{ title }</h1>
                { actions }
            </div>
            <div class="pt-5 space-y-6">
                { children }
            </div>
        </div>
    }
}

#[derive(Clone, Copy, PartialEq)]
enum StatIcon {
    UpRight,
    CreditCard,
    Wallet,
}

#[derive(Properties, PartialEq)]
struct StatCardProps {
    title: &'static str,
    amount: f64,
    icon: StatIcon,
}

#[function_component(StatCard)]
fn stat_card(props: &StatCardProps) -> Html {
    html! {
        <div class="bg-card p-6 rounded-[10px] shadow-sm border border-border flex justify-between items-start">
            <div>
                <p class="text-muted-foreground text-[10px] font-bold mb-1 tracking-widest">{ props.title }</p>
                <h3 class="text-2xl font-bold text-[#1D617A] tracking-tight">{ format_currency(props.amount, CURRENCY_SYMBOL) }</h3>
            </div>
            <div class="p-3 bg-[#eef4f9] rounded-[10px]">
                {
                    match props.icon {
                        StatIcon::UpRight => icon_arrow_up_right(),
                        StatIcon::CreditCard => icon_credit_card(),
                        StatIcon::Wallet => icon_wallet(),
                    }
                }
            </div>
        </div>
    }
}

fn form_message(error: &Option<String>) -> Html {
    match error {
        Some(msg) => html! { <p class="text-sm text-red-500">{ msg.clone() }</p> },
        None => html! {},
    }
}

fn bind_input(state: &UseStateHandle<String>) -> Callback<InputEvent> {
    let state = state.clone();
    Callback::from(move |e: InputEvent| {
        let input: web_sys::HtmlInputElement = e.target_unchecked_into();
        state.set(input.value());
    })
}

fn bind_select(state: &UseStateHandle<String>) -> Callback<Event> {
    let state = state.clone();
    Callback::from(move |e: Event| {
        let select: web_sys::HtmlSelectElement = e.target_unchecked_into();
        state.set(select.value());
    })
}

/// Current month (1-based) and year from the browser clock.
fn current_month() -> (u32, i32) {
    let now = js_sys::Date::new_0();
    (now.get_month() + 1, now.get_full_year() as i32)
}

fn icon_base(path: &'static str) -> Html {
    html! {
        <svg width="20" height="20" viewBox="0 0 24 24" fill="none" stroke="currentColor" stroke-width="2" stroke-linecap="round" stroke-linejoin="round" class="text-foreground">
            <path d={path}></path>
        </svg>
    }
}

fn icon_layout_grid() -> Html {
    icon_base("M3 3h8v8H3zM13 3h8v8h-8zM3 13h8v8H3zM13 13h8v8h-8z")
}
fn icon_wallet() -> Html {
    icon_base("M3 7h18v10H3zM16 7V5H5v2")
}
fn icon_credit_card() -> Html {
    icon_base("M3 7h18v10H3zM3 11h18")
}
fn icon_tag() -> Html {
    icon_base("M20.6 13.4l-7.2 7.2a2 2 0 01-2.8 0L2 12V2h10l8.6 8.6a2 2 0 010 2.8zM7 7h.01")
}
fn icon_bar_chart() -> Html {
    icon_base("M4 20V10M10 20V4M16 20v-6M22 20H2")
}
fn icon_log_out() -> Html {
    icon_base("M9 21H5a2 2 0 01-2-2V5a2 2 0 012-2h4M16 17l5-5-5-5M21 12H9")
}
fn icon_plus() -> Html {
    icon_base("M12 5v14M5 12h14")
}
fn icon_trash() -> Html {
    icon_base("M3 6h18M8 6V4h8v2M19 6l-1 14H6L5 6")
}
fn icon_arrow_up_right() -> Html {
    icon_base("M7 17L17 7M7 7h10v10")
}
