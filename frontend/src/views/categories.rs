use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

use super::{bind_input, bind_select, form_message, icon_trash, page_shell, PageProps};
use crate::models::{Category, CategoryPatch, MovementKind, NewCategory, RecordId};

fn kind_from_form(value: &str) -> Option<MovementKind> {
    match value {
        "income" => Some(MovementKind::Income),
        "expense" => Some(MovementKind::Expense),
        _ => None,
    }
}

#[function_component(CategoriesPage)]
pub fn categories_page(props: &PageProps) -> Html {
    let categories = use_state(|| props.ctx.categories.items());
    let form_name = use_state(String::new);
    let form_kind = use_state(|| "expense".to_string());
    let form_error = use_state(|| None::<String>);
    let editing = use_state(|| None::<(RecordId, String)>);

    {
        let categories = categories.clone();
        let store = props.ctx.categories.clone();
        use_effect_with_deps(
            move |_| {
                spawn_local(async move {
                    store.fetch_list().await;
                    categories.set(store.items());
                });
                || ()
            },
            (),
        );
    }

    let on_add = {
        let form_name = form_name.clone();
        let form_kind = form_kind.clone();
        let form_error = form_error.clone();
        let categories = categories.clone();
        let store = props.ctx.categories.clone();
        Callback::from(move |_| {
            let name = form_name.trim().to_string();
            if name.is_empty() {
                form_error.set(Some("Category name is required.".to_string()));
                return;
            }
            form_error.set(None);
            let draft = NewCategory {
                name,
                kind: kind_from_form(&form_kind),
            };
            let form_name = form_name.clone();
            let form_error = form_error.clone();
            let categories = categories.clone();
            let store = store.clone();
            spawn_local(async move {
                if store.create(&draft).await {
                    form_name.set(String::new());
                } else {
                    form_error.set(Some("Could not save the category.".to_string()));
                }
                categories.set(store.items());
            });
        })
    };

    let on_rename = {
        let editing = editing.clone();
        let categories = categories.clone();
        let form_error = form_error.clone();
        let store = props.ctx.categories.clone();
        Callback::from(move |_| {
            let Some((id, name)) = (*editing).clone() else {
                return;
            };
            let patch = CategoryPatch {
                name: Some(name.trim().to_string()),
                ..CategoryPatch::default()
            };
            let editing = editing.clone();
            let categories = categories.clone();
            let form_error = form_error.clone();
            let store = store.clone();
            spawn_local(async move {
                if store.update(id, &patch).await {
                    editing.set(None);
                } else {
                    form_error.set(Some("Could not rename the category.".to_string()));
                }
                categories.set(store.items());
            });
        })
    };

    let on_delete = {
        let categories = categories.clone();
        let store = props.ctx.categories.clone();
        Callback::from(move |id: RecordId| {
            let categories = categories.clone();
            let store = store.clone();
            spawn_local(async move {
                store.delete(id).await;
                categories.set(store.items());
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
        "Categories",
        html! {},
        html! {
            <>
                <div class="bg-card rounded-[10px] p-6 border border-border">
                    <div class="flex gap-3">
                        <input placeholder="Category name" value={(*form_name).clone()} oninput={bind_input(&form_name)} class="p-2 border rounded flex-1" />
                        <select class="p-2 border rounded" onchange={bind_select(&form_kind)}>
                            <option value="expense" selected={*form_kind == "expense"}>{ MovementKind::Expense.label() }</option>
                            <option value="income" selected={*form_kind == "income"}>{ MovementKind::Income.label() }</option>
                        </select>
                        <button onclick={on_add} class="bg-accent text-white px-4 rounded">{"Add"}</button>
                    </div>
                    { form_message(&form_error) }
                </div>

                <div class="bg-card rounded-[10px] shadow-sm border border-border divide-y divide-border">
                    { for categories.iter().map(|category: &Category| {
                        let id = category.id;
                        let on_delete = on_delete.clone();
                        let is_editing = matches!(&*editing, Some((editing_id, _)) if *editing_id == id);
                        let kind_label = category.kind.map(MovementKind::label).unwrap_or("-");

                        html! {
                            <div key={id} class="flex items-center justify-between px-6 py-3 text-sm">
                                if is_editing {
                                    <div class="flex gap-2 flex-1">
                                        <input
                                            class="p-2 border rounded flex-1"
                                            value={(*editing).as_ref().map(|(_, name)| name.clone()).unwrap_or_default()}
                                            oninput={on_edit_input.clone()}
                                        />
                                        <button class="bg-primary text-primary-foreground px-3 rounded" onclick={on_rename.clone()}>{"Save"}</button>
                                    </div>
                                } else {
                                    <button
                                        class="text-foreground text-left flex-1"
                                        onclick={{
                                            let editing = editing.clone();
                                            let name = category.name.clone();
                                            Callback::from(move |_| editing.set(Some((id, name.clone()))))
                                        }}
                                    >
                                        { &category.name }
                                    </button>
                                }
                                <span class="text-xs text-muted-foreground px-4">{ kind_label }</span>
                                <button aria-label="Delete" onclick={Callback::from(move |_| on_delete.emit(id))}>{ icon_trash() }</button>
                            </div>
                        }
                    }) }
                </div>
            </>
        },
    )
}
