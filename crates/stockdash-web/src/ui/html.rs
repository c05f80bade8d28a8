//! Page layout: header, menu selector, argument form and the rendered page.

pub const TEMPLATE: &str = r#"
    <div class="container">
        <header>
            <div>
                <h1>stockdash</h1>
                <span class="refresh-time" id="refreshTime">Pick a view</span>
            </div>
            <div class="header-controls">
                <select id="menu" onchange="onMenuChange()"></select>
                <button class="btn btn-primary" onclick="renderView()" id="renderBtn">Render</button>
            </div>
        </header>

        <p class="description" id="menuDescription"></p>

        <form class="args" id="args" onsubmit="event.preventDefault(); renderView();">
            <label data-views="stock">Symbol <input name="symbol" placeholder="AAPL"></label>
            <label data-views="scanner etf returns risk">Symbols <input name="symbols" placeholder="AAPL,MSFT"></label>
            <label data-views="stock scanner etf returns risk portfolio rebalance">Start <input name="start" type="date"></label>
            <label data-views="stock scanner etf returns risk portfolio rebalance">End <input name="end" type="date"></label>
            <label data-views="stock scanner etf returns risk">Interval
                <select name="interval">
                    <option value="">default</option>
                    <option value="1d">1d</option>
                    <option value="1wk">1wk</option>
                    <option value="1mo">1mo</option>
                    <option value="1h">1h</option>
                </select>
            </label>
            <label data-views="scanner">Filter
                <select name="filter">
                    <option value="">all</option>
                    <option value="oversold">oversold</option>
                    <option value="overbought">overbought</option>
                    <option value="above-trend">above trend</option>
                    <option value="below-trend">below trend</option>
                </select>
            </label>
            <label data-views="scanner">Sort
                <select name="sort">
                    <option value="">change</option>
                    <option value="rsi">rsi</option>
                    <option value="volume">volume</option>
                    <option value="symbol">symbol</option>
                </select>
            </label>
            <label data-views="etf">Profile
                <select name="profile">
                    <option value="">balanced</option>
                    <option value="conservative">conservative</option>
                    <option value="aggressive">aggressive</option>
                </select>
            </label>
            <label data-views="etf">Top <input name="top" type="number" min="1"></label>
            <label data-views="returns">Benchmark <input name="benchmark" placeholder="SPY"></label>
            <label data-views="rebalance">Tolerance <input name="tolerance" type="number" step="0.01" min="0" max="1"></label>
            <label data-views="stock etf" class="checkbox"><input name="commentary" type="checkbox"> AI commentary</label>
        </form>

        <div class="error hidden" id="error"></div>

        <main id="page">
            <div class="empty-state">Select a view and press Render</div>
        </main>
    </div>
"#;
