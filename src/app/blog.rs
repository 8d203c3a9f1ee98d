use leptos::{either::Either, prelude::*, server_fn::codec::GetUrl};
use leptos_meta::Title;
use leptos_router::hooks::use_params_map;

#[cfg(feature = "ssr")]
use crate::blog::{get_meta, get_post};
use crate::blog::{Post, PostMeta, GLOBAL_POST_CACHE};

#[server(input = GetUrl)]
pub async fn get_meta_server() -> Result<Vec<PostMeta>, ServerFnError> {
    get_meta().await.map_err(|e| {
        tracing::error!(error = %e, "blog metadata unavailable");
        ServerFnError::new(e)
    })
}

#[server(input = GetUrl)]
pub async fn get_post_server(name: String) -> Result<Option<Post>, ServerFnError> {
    match get_post(name).await {
        Ok(post) => Ok(Some(post)),
        Err(crate::blog::BlogError::NotFound) => Ok(None),
        Err(e) => Err(ServerFnError::new(e)),
    }
}

#[component]
pub fn BlogPost() -> impl IntoView {
    let params = use_params_map();
    let slug = move || params.with(|p| p.get("slug").unwrap_or_default());

    let post = Resource::new(slug, |name| async move {
        let cache = &*GLOBAL_POST_CACHE;
        if let Some(cached) = cache.get(&name) {
            return (*cached).clone();
        }
        match get_post_server(name.clone()).await {
            Ok(post) => {
                #[cfg(feature = "hydrate")]
                cache.insert(name, post.clone());
                post
            }
            Err(e) => {
                log::error!("couldn't load post {name}: {e}");
                None
            }
        }
    });

    view! {
        <div class="max-w-3xl mx-auto px-4 py-12">
            <a href="/" class="text-violet-600 dark:text-violet-400 hover:underline">
                "← Back home"
            </a>
            <Transition fallback=move || {
                view! {
                    <div class="space-y-4 mt-8">
                        <div class="loading-skeleton h-10 rounded w-3/4"></div>
                        <div class="loading-skeleton h-6 rounded w-1/3"></div>
                        <div class="loading-skeleton h-64 rounded"></div>
                    </div>
                }
            }>
                {move || Suspend::new(async move {
                    match post.await {
                        Some(post) => {
                            let meta = post.meta;
                            Either::Left(
                                view! {
                                    <Title text=meta.title.clone() />
                                    <article class="mt-8">
                                        <h1 class="text-4xl font-bold mb-2">{meta.title}</h1>
                                        <div class="text-sm text-gray-500 mb-8">
                                            {meta.author} " · "
                                            <time datetime=meta.date.to_rfc3339()>
                                                {meta.date.format("%B %-d, %Y").to_string()}
                                            </time>
                                        </div>
                                        <div class="prose dark:prose-invert max-w-none" inner_html=post.content />
                                        <ul class="flex flex-wrap gap-2 mt-8">
                                            {meta
                                                .tags
                                                .into_iter()
                                                .map(|tag| {
                                                    view! {
                                                        <li class="px-2 py-1 text-xs rounded-full bg-gray-100 dark:bg-gray-800">
                                                            {format!("#{tag}")}
                                                        </li>
                                                    }
                                                })
                                                .collect_view()}
                                        </ul>
                                    </article>
                                },
                            )
                        }
                        None => Either::Right(view! { <super::NotFound /> }),
                    }
                })}
            </Transition>
        </div>
    }
}
