use std::rc::Rc;

use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

use super::{bind_input, current_month, page_shell, PageProps, StatCard, StatIcon};
use crate::format::{format_currency, month_name, CURRENCY_SYMBOL};
use crate::models::{Movement, MonthlySummary};
use crate::store::MovementStore;

const RECENT_LIMIT: usize = 8;

#[hook]
fn use_monthly_summary(store: Rc<MovementStore>, month: u32, year: i32) -> UseStateHandle<MonthlySummary> {
    let summary = {
        let store = store.clone();
        use_state(move || store.summary())
    };
    {
        let summary = summary.clone();
        use_effect_with_deps(
            move |&(month, year)| {
                spawn_local(async move {
                    store.fetch_monthly_summary(month, year).await;
                    summary.set(store.summary());
                });
                || ()
            },
            (month, year),
        );
    }
    summary
}

fn movement_rows(movements: &[Movement]) -> Html {
    html! {
        <tbody class="divide-y divide-border">
            { for movements.iter().map(|movement| {
                let amount = movement.signed_amount();
                let amount_label = if amount > 0.0 {
                    format!("+ {}", format_currency(amount, CURRENCY_SYMBOL))
                } else {
                    format_currency(amount, CURRENCY_SYMBOL)
                };

                html! {
                    <tr key={movement.id} class="text-sm hover:bg-muted/30 transition-colors">
                        <td class="px-8 py-4 text-muted-foreground">{ &movement.date }</td>
                        <td class="px-8 py-4 text-foreground">{ &movement.description }</td>
                        <td class="px-8 py-4">
                            <span class="bg-secondary text-secondary-foreground px-3 py-1 rounded-full text-[10px] font-bold">
                                { movement.category_name().unwrap_or("-") }
                            </span>
                        </td>
                        <td class="px-8 py-4 text-right font-semibold text-foreground">{ amount_label }</td>
                    </tr>
                }
            }) }
        </tbody>
    }
}

fn movements_table(title: String, movements: &[Movement]) -> Html {
    html! {
        <div class="bg-card rounded-[10px] shadow-sm border border-border overflow-hidden">
            <div class="p-6 flex justify-between items-center border-b border-border">
                <h3 class="font-bold text-foreground text-lg">{ title }</h3>
            </div>
            if movements.is_empty() {
                <p class="p-6 text-sm text-muted-foreground">{"No movements this month."}</p>
            } else {
                <div class="overflow-x-auto">
                    <table class="w-full text-left border-collapse">
                        <thead>
                            <tr class="bg-muted/50 text-muted-foreground text-[10px] uppercase tracking-widest">
                                <th class="px-8 py-4 font-bold">{"Date"}</th>
                                <th class="px-8 py-4 font-bold">{"Description"}</th>
                                <th class="px-8 py-4 font-bold">{"Category"}</th>
                                <th class="px-8 py-4 font-bold text-right">{"Amount"}</th>
                            </tr>
                        </thead>
                        { movement_rows(movements) }
                    </table>
                </div>
            }
        </div>
    }
}

fn summary_cards(summary: &MonthlySummary) -> Html {
    html! {
        <div class="grid grid-cols-1 md:grid-cols-3 gap-6">
            <StatCard title="Income" amount={summary.income} icon={StatIcon::UpRight} />
            <StatCard title="Expenses" amount={summary.expense} icon={StatIcon::CreditCard} />
            <StatCard title="Balance" amount={summary.balance} icon={StatIcon::Wallet} />
        </div>
    }
}

#[function_component(DashboardPage)]
pub fn dashboard_page(props: &PageProps) -> Html {
    let (month, year) = current_month();
    let summary = use_monthly_summary(props.ctx.movements.clone(), month, year);
    let recent: Vec<Movement> = summary.movements.iter().take(RECENT_LIMIT).cloned().collect();

    page_shell(
        "Dashboard",
        html! {
            <span class="text-sm text-muted-foreground">{ format!("{} {}", month_name(month), year) }</span>
        },
        html! {
            <>
                { summary_cards(&summary) }
                { movements_table("Recent Movements".to_string(), &recent) }
            </>
        },
    )
}

#[function_component(ReportsPage)]
pub fn reports_page(props: &PageProps) -> Html {
    let (this_month, this_year) = current_month();
    let month = use_state(|| this_month);
    let year = use_state(|| this_year);
    let year_input = use_state(|| this_year.to_string());
    let summary = use_monthly_summary(props.ctx.movements.clone(), *month, *year);

    let on_month = {
        let month = month.clone();
        Callback::from(move |e: Event| {
            let select: web_sys::HtmlSelectElement = e.target_unchecked_into();
            if let Ok(value) = select.value().parse::<u32>() {
                month.set(value);
            }
        })
    };

    let on_apply_year = {
        let year = year.clone();
        let year_input = year_input.clone();
        Callback::from(move |_| {
            if let Ok(value) = year_input.trim().parse::<i32>() {
                year.set(value);
            }
        })
    };

    page_shell(
        "Reports",
        html! {
            <div class="flex items-center gap-2">
                <select class="p-2 border rounded" onchange={on_month}>
                    { for (1..=12u32).map(|m| html! {
                        <option value={m.to_string()} selected={m == *month}>{ month_name(m) }</option>
                    }) }
                </select>
                <input class="p-2 border rounded w-24" value={(*year_input).clone()} oninput={bind_input(&year_input)} />
                <button class="bg-primary text-primary-foreground px-4 py-2 rounded-xl font-bold text-sm" onclick={on_apply_year}>{"Show"}</button>
            </div>
        },
        html! {
            <>
                { summary_cards(&summary) }
                { movements_table(format!("{} {}", month_name(*month), *year), &summary.movements) }
            </>
        },
    )
}
