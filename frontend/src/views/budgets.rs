use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

use super::{bind_input, bind_select, current_month, form_message, icon_trash, page_shell, PageProps};
use crate::format::{format_currency, month_name, CURRENCY_SYMBOL};
use crate::models::{Budget, BudgetPatch, NewBudget, RecordId};

fn parse_amount(value: &str) -> Option<f64> {
    value
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|amount| amount.is_finite() && *amount > 0.0)
}

fn budget_period(budget: &Budget) -> String {
    match (budget.month, budget.year) {
        (Some(month), Some(year)) => format!("{} {}", month_name(month), year),
        (None, Some(year)) => year.to_string(),
        _ => "-".to_string(),
    }
}

#[function_component(BudgetsPage)]
pub fn budgets_page(props: &PageProps) -> Html {
    let budgets = use_state(|| props.ctx.budgets.items());
    let categories = use_state(|| props.ctx.categories.items());
    let form_amount = use_state(String::new);
    let form_category = use_state(String::new);
    let form_error = use_state(|| None::<String>);
    let editing = use_state(|| None::<(RecordId, String)>);

    {
        let budgets = budgets.clone();
        let categories = categories.clone();
        let ctx = props.ctx.clone();
        use_effect_with_deps(
            move |_| {
                spawn_local(async move {
                    ctx.budgets.fetch_list().await;
                    budgets.set(ctx.budgets.items());
                    ctx.categories.fetch_list().await;
                    categories.set(ctx.categories.items());
                });
                || ()
            },
            (),
        );
    }

    let on_add = {
        let form_amount = form_amount.clone();
        let form_category = form_category.clone();
        let form_error = form_error.clone();
        let budgets = budgets.clone();
        let store = props.ctx.budgets.clone();
        Callback::from(move |_| {
            let Some(amount) = parse_amount(&form_amount) else {
                form_error.set(Some("Amount must be a positive number.".to_string()));
                return;
            };
            form_error.set(None);
            let (month, year) = current_month();
            let draft = NewBudget {
                month: Some(month),
                year: Some(year),
                category_id: form_category.parse::<RecordId>().ok(),
                ..NewBudget::new(amount)
            };
            let form_amount = form_amount.clone();
            let form_error = form_error.clone();
            let budgets = budgets.clone();
            let store = store.clone();
            spawn_local(async move {
                if store.create(&draft).await {
                    form_amount.set(String::new());
                } else {
                    form_error.set(Some("Could not save the budget.".to_string()));
                }
                budgets.set(store.items());
            });
        })
    };

    let on_save_amount = {
        let editing = editing.clone();
        let form_error = form_error.clone();
        let budgets = budgets.clone();
        let store = props.ctx.budgets.clone();
        Callback::from(move |_| {
            let Some((id, raw)) = (*editing).clone() else {
                return;
            };
            let Some(amount) = parse_amount(&raw) else {
                form_error.set(Some("Amount must be a positive number.".to_string()));
                return;
            };
            let patch = BudgetPatch {
                amount: Some(amount),
                ..BudgetPatch::default()
            };
            let editing = editing.clone();
            let form_error = form_error.clone();
            let budgets = budgets.clone();
            let store = store.clone();
            spawn_local(async move {
                if store.update(id, &patch).await {
                    editing.set(None);
                } else {
                    form_error.set(Some("Could not update the budget.".to_string()));
                }
                budgets.set(store.items());
            });
        })
    };

    let on_delete = {
        let budgets = budgets.clone();
        let store = props.ctx.budgets.clone();
        Callback::from(move |id: RecordId| {
            let budgets = budgets.clone();
            let store = store.clone();
            spawn_local(async move {
                store.delete(id).await;
                budgets.set(store.items());
            });
        })
    };

    let on_edit_input = {
        let editing = editing.clone();
        Callback::from(move |e: InputEvent| {
            let input: web_sys::HtmlInputElement = e.target_unchecked_into();
            if let Some((id, _)) = *editing {
                editing.set(Some((id, input.value())));
            }
        })
    };

    page_shell(
        "Budgets",
        html! {},
        html! {
            <>
                <div class="bg-card rounded-[10px] p-6 border border-border">
                    <div class="flex gap-3">
                        <input placeholder={format!("Monthly limit ({})", CURRENCY_SYMBOL)} value={(*form_amount).clone()} oninput={bind_input(&form_amount)} class="p-2 border rounded flex-1" />
                        <select class="p-2 border rounded" onchange={bind_select(&form_category)}>
                            <option value="" selected={form_category.is_empty()}>{"All categories"}</option>
                            { for categories.iter().map(|category| html! {
                                <option value={category.id.to_string()} selected={*form_category == category.id.to_string()}>{ &category.name }</option>
                            }) }
                        </select>
                        <button onclick={on_add} class="bg-accent text-white px-4 rounded">{"Add"}</button>
                    </div>
                    { form_message(&form_error) }
                </div>

                <div class="bg-card rounded-[10px] shadow-sm border border-border divide-y divide-border">
                    { for budgets.iter().map(|budget: &Budget| {
                        let id = budget.id;
                        let on_delete = on_delete.clone();
                        let is_editing = matches!(&*editing, Some((editing_id, _)) if *editing_id == id);
                        let category = budget
                            .category
                            .as_ref()
                            .map(|category| category.name.clone())
                            .unwrap_or_else(|| "All categories".to_string());

                        html! {
                            <div key={id} class="flex items-center justify-between px-6 py-3 text-sm gap-4">
                                <span class="text-foreground flex-1">{ category }</span>
                                <span class="text-muted-foreground">{ budget_period(budget) }</span>
                                if is_editing {
                                    <>
                                        <input
                                            class="p-2 border rounded w-32"
                                            value={(*editing).as_ref().map(|(_, raw)| raw.clone()).unwrap_or_default()}
                                            oninput={on_edit_input.clone()}
                                        />
                                        <button class="bg-primary text-primary-foreground px-3 rounded" onclick={on_save_amount.clone()}>{"Save"}</button>
                                    </>
                                } else {
                                    <button
                                        class="font-semibold text-foreground"
                                        onclick={{
                                            let editing = editing.clone();
                                            let raw = budget.amount.to_string();
                                            Callback::from(move |_| editing.set(Some((id, raw.clone()))))
                                        }}
                                    >
                                        { format_currency(budget.amount, CURRENCY_SYMBOL) }
                                    </button>
                                }
                                <button aria-label="Delete" onclick={Callback::from(move |_| on_delete.emit(id))}>{ icon_trash() }</button>
                            </div>
                        }
                    }) }
                </div>
            </>
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn amounts_must_be_positive_numbers() {
        assert_eq!(parse_amount(" 120.5 "), Some(120.5));
        assert_eq!(parse_amount("0"), None);
        assert_eq!(parse_amount("abc"), None);
    }

    #[test]
    fn period_reads_month_and_year() {
        let budget = Budget {
            id: 1,
            amount: 10.0,
            month: Some(3),
            year: Some(2026),
            category_id: None,
            category: None,
        };
        assert_eq!(budget_period(&budget), "March 2026");
    }
}
