use leptos::{either::Either, prelude::*};
use leptos_meta::Title;
use leptos_router::hooks::use_params_map;

use crate::content::{project, Project};

#[component]
pub fn ProjectDetails() -> impl IntoView {
    let params = use_params_map();
    let found = move || params.with(|p| p.get("slug").and_then(|slug| project(&slug)));

    move || match found() {
        Some(project) => Either::Left(view! { <ProjectPage project /> }),
        None => Either::Right(view! { <super::NotFound /> }),
    }
}

#[component]
fn ProjectPage(project: &'static Project) -> impl IntoView {
    let link = |href: &Option<String>, label: &'static str| {
        href.clone().map(|href| {
            view! {
                <a
                    href=href
                    target="_blank"
                    rel="noopener noreferrer"
                    class="px-4 py-2 rounded-full bg-violet-600 text-white font-semibold hover:bg-violet-700 transition-colors"
                >
                    {label}
                </a>
            }
        })
    };

    view! {
        <Title text=project.title.clone() />
        <article class="max-w-3xl mx-auto px-4 py-12">
            <a href="/#projects" class="text-violet-600 dark:text-violet-400 hover:underline">
                "← All projects"
            </a>
            <h1 class="text-4xl font-bold mt-6 mb-2">{project.title.clone()}</h1>
            {project
                .subtitle
                .clone()
                .map(|s| view! { <p class="text-lg text-gray-500 mb-6">{s}</p> })}
            {project
                .image
                .clone()
                .map(|src| {
                    view! {
                        <img
                            src=src
                            alt=project.title.clone()
                            class="w-full rounded-2xl shadow mb-8"
                        />
                    }
                })}
            {project
                .overview
                .clone()
                .or_else(|| project.description.clone())
                .map(|text| {
                    view! {
                        <h2 class="text-2xl font-semibold mb-3">"Overview"</h2>
                        <p class="text-gray-600 dark:text-gray-300 mb-6 leading-relaxed">{text}</p>
                    }
                })}
            {project
                .role
                .clone()
                .map(|role| {
                    view! {
                        <h2 class="text-2xl font-semibold mb-3">"My Role"</h2>
                        <p class="text-gray-600 dark:text-gray-300 mb-6">{role}</p>
                    }
                })}
            <h2 class="text-2xl font-semibold mb-3">"Tech"</h2>
            <ul class="flex flex-wrap gap-2 mb-8">
                {project
                    .tech
                    .iter()
                    .map(|t| {
                        view! {
                            <li class="px-3 py-1 text-sm rounded-full bg-violet-100 text-violet-700 dark:bg-violet-900/40 dark:text-violet-300">
                                {t.clone()}
                            </li>
                        }
                    })
                    .collect_view()}
            </ul>
            <div class="flex gap-4">
                {link(&project.demo, "Live demo")} {link(&project.repo, "Source")}
            </div>
        </article>
    }
}
